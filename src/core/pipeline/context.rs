//! Export context
//!
//! The single mutable record threaded through every step of a run. Each
//! field notes the step that populates it; a step may only rely on fields
//! written by steps that the pipeline order guarantees ran before it.

use crate::adapters::space::ContentApi;
use crate::domain::{Result, SpacedumpError};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Exported records keyed by entity type, in first-populated order
pub type ExportData = IndexMap<String, Vec<Value>>;

/// Result counters of the asset download step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDownloadSummary {
    pub success_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
}

/// Shared state of one export run
#[derive(Default)]
pub struct ExportContext {
    /// Populated by the fetch steps; keys are never removed.
    data: ExportData,

    /// Populated by "Initialize client".
    client: Option<Arc<dyn ContentApi>>,

    /// Populated by "Initialize client" when a delivery token is configured.
    delivery_client: Option<Arc<dyn ContentApi>>,

    /// Populated by "Download assets" only. `None` means the step never ran.
    pub asset_downloads: Option<AssetDownloadSummary>,

    /// Populated by "Lookup directory to store the logs".
    pub log_directory_exists: bool,
}

impl ExportContext {
    /// Creates an empty context for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Exported data so far
    pub fn data(&self) -> &ExportData {
        &self.data
    }

    /// Consumes the context, returning the exported data
    pub fn into_data(self) -> ExportData {
        self.data
    }

    /// Whether a collection has been populated (even with zero records)
    pub fn has_collection(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Records of one collection, if populated
    pub fn collection(&self, name: &str) -> Option<&[Value]> {
        self.data.get(name).map(Vec::as_slice)
    }

    /// Appends records to a collection, creating the key on first use
    ///
    /// Calling this with no records still creates the key, so the report
    /// shows the collection with a zero count.
    pub fn extend_collection(&mut self, name: &str, records: impl IntoIterator<Item = Value>) {
        self.data
            .entry(name.to_string())
            .or_default()
            .extend(records);
    }

    /// Installs the API clients
    pub fn set_clients(
        &mut self,
        client: Arc<dyn ContentApi>,
        delivery_client: Option<Arc<dyn ContentApi>>,
    ) {
        self.client = Some(client);
        self.delivery_client = delivery_client;
    }

    /// Management client
    ///
    /// # Errors
    ///
    /// Returns a pipeline error if no earlier step installed the client.
    pub fn client(&self) -> Result<Arc<dyn ContentApi>> {
        self.client.clone().ok_or_else(|| {
            SpacedumpError::Pipeline("management client used before initialization".to_string())
        })
    }

    /// Delivery client, when one was configured
    pub fn delivery_client(&self) -> Option<Arc<dyn ContentApi>> {
        self.delivery_client.clone()
    }
}

impl fmt::Debug for ExportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(&str, usize)> = self
            .data
            .iter()
            .map(|(name, records)| (name.as_str(), records.len()))
            .collect();
        f.debug_struct("ExportContext")
            .field("data", &counts)
            .field("client", &self.client.is_some())
            .field("delivery_client", &self.delivery_client.is_some())
            .field("asset_downloads", &self.asset_downloads)
            .field("log_directory_exists", &self.log_directory_exists)
            .finish()
    }
}
