//! Space API models
//!
//! Collections of a space, their REST paths, and the paged list envelope.

use crate::domain::ids::EnvironmentId;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Exportable collection of a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    ContentTypes,
    Tags,
    EditorInterfaces,
    Entries,
    Assets,
    Locales,
    Webhooks,
    Roles,
}

impl Collection {
    /// Every collection, in export order
    pub const ALL: [Collection; 8] = [
        Collection::ContentTypes,
        Collection::Tags,
        Collection::EditorInterfaces,
        Collection::Entries,
        Collection::Assets,
        Collection::Locales,
        Collection::Webhooks,
        Collection::Roles,
    ];

    /// Key of the collection in the exported snapshot
    pub fn key(self) -> &'static str {
        match self {
            Collection::ContentTypes => "contentTypes",
            Collection::Tags => "tags",
            Collection::EditorInterfaces => "editorInterfaces",
            Collection::Entries => "entries",
            Collection::Assets => "assets",
            Collection::Locales => "locales",
            Collection::Webhooks => "webhooks",
            Collection::Roles => "roles",
        }
    }

    /// Human-readable name used in step titles
    pub fn label(self) -> &'static str {
        match self {
            Collection::ContentTypes => "content types",
            Collection::Tags => "tags",
            Collection::EditorInterfaces => "editor interfaces",
            Collection::Entries => "entries",
            Collection::Assets => "assets",
            Collection::Locales => "locales",
            Collection::Webhooks => "webhooks",
            Collection::Roles => "roles",
        }
    }

    /// Space-level collections exist once per space, not per environment
    pub fn is_space_level(self) -> bool {
        matches!(self, Collection::Webhooks | Collection::Roles)
    }

    /// Path of the list endpoint, relative to the space
    ///
    /// Editor interfaces have no list endpoint; see [`editor_interface_path`].
    pub fn path(self, environment: &EnvironmentId) -> String {
        match self {
            Collection::Webhooks => "webhook_definitions".to_string(),
            Collection::Roles => "roles".to_string(),
            Collection::ContentTypes | Collection::EditorInterfaces => {
                format!("environments/{environment}/content_types")
            }
            Collection::Tags => format!("environments/{environment}/tags"),
            Collection::Entries => format!("environments/{environment}/entries"),
            Collection::Assets => format!("environments/{environment}/assets"),
            Collection::Locales => format!("environments/{environment}/locales"),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Path of the editor interface of one content type
pub fn editor_interface_path(environment: &EnvironmentId, content_type_id: &str) -> String {
    format!("environments/{environment}/content_types/{content_type_id}/editor_interface")
}

/// Path of the environment resource itself
pub fn environment_path(environment: &EnvironmentId) -> String {
    format!("environments/{environment}")
}

/// Query of one list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub skip: usize,
    pub limit: usize,
    pub order: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl PageQuery {
    /// Stable order used for every paged listing
    pub const DEFAULT_ORDER: &'static str = "sys.createdAt,sys.id";

    /// First page with the default order and no filters
    pub fn first(limit: usize) -> Self {
        Self {
            skip: 0,
            limit,
            order: Some(Self::DEFAULT_ORDER.to_string()),
            filters: Vec::new(),
        }
    }

    pub fn with_filters(mut self, filters: Vec<(String, String)>) -> Self {
        self.filters = filters;
        self
    }

    /// Query of the following page
    pub fn next(&self) -> Self {
        Self {
            skip: self.skip + self.limit,
            ..self.clone()
        }
    }

    /// Query string pairs, filters last
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("skip".to_string(), self.skip.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// Paged list envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Value>,
    pub total: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Identifier of a record (`sys.id`)
pub fn record_id(record: &Value) -> Option<&str> {
    record.pointer("/sys/id").and_then(Value::as_str)
}

/// Whether the record has ever been published
pub fn is_published(record: &Value) -> bool {
    record
        .pointer("/sys/publishedVersion")
        .is_some_and(|v| !v.is_null())
}

/// Whether the record is archived
pub fn is_archived(record: &Value) -> bool {
    record
        .pointer("/sys/archivedVersion")
        .is_some_and(|v| !v.is_null())
}
