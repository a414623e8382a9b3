//! "Fetching data from space" step
//!
//! Expands at run time into one step per collection. Every collection step
//! carries its own skip predicate derived from the export settings.

use crate::adapters::space::models::{editor_interface_path, is_archived, is_published, record_id};
use crate::adapters::space::{Collection, ContentApi, PageQuery};
use crate::config::{ExportConfig, SpaceConfig};
use crate::core::pipeline::{ExportContext, Step, StepAction, StepIo, StepOutcome};
use crate::domain::ids::EnvironmentId;
use crate::domain::{ApiError, Result, SpacedumpError};
use crate::log_collection_fetched;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const TITLE: &str = "Fetching data from space";

/// What to fetch, resolved from configuration once per run
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub environment_id: EnvironmentId,
    pub page_size: usize,
    pub include_drafts: bool,
    pub include_archived: bool,
    pub skip_content_model: bool,
    pub skip_content: bool,
    pub skip_webhooks: bool,
    pub skip_roles: bool,
    pub entry_filters: Vec<(String, String)>,
    pub asset_filters: Vec<(String, String)>,
}

impl FetchSettings {
    pub fn from_config(space: &SpaceConfig, export: &ExportConfig) -> Self {
        Self {
            environment_id: space.environment_id.clone(),
            page_size: export.max_allowed_limit,
            include_drafts: export.include_drafts,
            include_archived: export.include_archived,
            skip_content_model: export.skip_content_model,
            skip_content: export.skip_content,
            skip_webhooks: export.skip_webhooks,
            skip_roles: export.skip_roles,
            entry_filters: export.entry_filters(),
            asset_filters: export.asset_filters(),
        }
    }

    fn filters(&self, collection: Collection) -> Vec<(String, String)> {
        match collection {
            Collection::Entries => self.entry_filters.clone(),
            Collection::Assets => self.asset_filters.clone(),
            _ => Vec::new(),
        }
    }

    /// Whether the collection is excluded by the settings
    pub fn skips(&self, collection: Collection) -> bool {
        match collection {
            Collection::ContentTypes
            | Collection::Tags
            | Collection::EditorInterfaces
            | Collection::Locales => self.skip_content_model,
            Collection::Entries | Collection::Assets => self.skip_content,
            // Space-level resources are only exported alongside the master environment
            Collection::Webhooks => self.skip_webhooks || !self.environment_id.is_master(),
            Collection::Roles => self.skip_roles || !self.environment_id.is_master(),
        }
    }
}

pub fn step(settings: FetchSettings) -> Step {
    Step::action(
        TITLE,
        FetchSpace {
            settings: Arc::new(settings),
        },
    )
}

struct FetchSpace {
    settings: Arc<FetchSettings>,
}

#[async_trait]
impl StepAction for FetchSpace {
    async fn run(&self, _ctx: &mut ExportContext, _io: &StepIo) -> Result<StepOutcome> {
        Ok(StepOutcome::Expand(collection_steps(&self.settings)))
    }
}

/// One step per collection, in export order
pub fn collection_steps(settings: &Arc<FetchSettings>) -> Vec<Step> {
    Collection::ALL
        .into_iter()
        .map(|collection| {
            let title = format!("Fetching {} data", collection.label());
            let step = match collection {
                Collection::EditorInterfaces => Step::action(
                    title,
                    FetchEditorInterfaces {
                        settings: Arc::clone(settings),
                    },
                ),
                _ => Step::action(
                    title,
                    FetchCollection {
                        collection,
                        settings: Arc::clone(settings),
                    },
                ),
            };
            let skipped = settings.skips(collection);
            step.skip_if(move |_| skipped)
        })
        .collect()
}

/// Reads every page of a list endpoint
///
/// Pages are requested with `skip`/`limit` until `skip` reaches the total
/// reported by the server. An empty page also ends the listing.
pub async fn fetch_all(
    api: &dyn ContentApi,
    path: &str,
    first: PageQuery,
    io: &StepIo,
) -> Result<Vec<Value>> {
    let mut query = first;
    let mut items = Vec::new();

    loop {
        let page = api.fetch_page(path, &query).await?;
        let received = page.items.len();
        items.extend(page.items);
        io.output(format!("Fetched {} of {}", items.len(), page.total));

        let next = query.next();
        if received == 0 || next.skip >= page.total {
            break;
        }
        query = next;
    }

    Ok(items)
}

/// Keeps records that are published (or archived) and not archived,
/// relaxed by the draft and archive switches
pub fn retain_exportable(records: Vec<Value>, include_drafts: bool, include_archived: bool) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| include_drafts || is_published(record) || is_archived(record))
        .filter(|record| include_archived || !is_archived(record))
        .collect()
}

struct FetchCollection {
    collection: Collection,
    settings: Arc<FetchSettings>,
}

#[async_trait]
impl StepAction for FetchCollection {
    async fn run(&self, ctx: &mut ExportContext, io: &StepIo) -> Result<StepOutcome> {
        let collection = self.collection;
        let settings = &self.settings;

        // Published entries come from the delivery API when one is configured.
        // Assets always come from the management API, which keeps `fields.file`
        // keyed by locale.
        let (api, published_only) = match (collection, ctx.delivery_client()) {
            (Collection::Entries, Some(delivery)) => (delivery, true),
            _ => (ctx.client()?, false),
        };

        let query = PageQuery::first(settings.page_size).with_filters(settings.filters(collection));
        let path = collection.path(&settings.environment_id);

        let records = match fetch_all(api.as_ref(), &path, query, io).await {
            Ok(records) => records,
            Err(SpacedumpError::Api(ApiError::NotFound(_))) if collection == Collection::Tags => {
                io.log()
                    .warning("Tags are not available for this environment, skipping them");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let fetched = records.len();

        let records = match collection {
            Collection::Entries | Collection::Assets if !published_only => {
                retain_exportable(records, settings.include_drafts, settings.include_archived)
            }
            _ => records,
        };

        if records.len() != fetched {
            tracing::debug!(
                collection = %collection,
                fetched,
                kept = records.len(),
                "Dropped drafts or archived records"
            );
        }

        log_collection_fetched!(collection, records.len());
        io.log()
            .info(format!("Fetched {} {}", records.len(), collection.label()));
        ctx.extend_collection(collection.key(), records);
        Ok(StepOutcome::Done)
    }
}

struct FetchEditorInterfaces {
    settings: Arc<FetchSettings>,
}

#[async_trait]
impl StepAction for FetchEditorInterfaces {
    async fn run(&self, ctx: &mut ExportContext, io: &StepIo) -> Result<StepOutcome> {
        let api = ctx.client()?;
        let content_type_ids: Vec<String> = ctx
            .collection(Collection::ContentTypes.key())
            .unwrap_or_default()
            .iter()
            .filter_map(|ct| record_id(ct).map(str::to_string))
            .collect();

        let mut interfaces = Vec::with_capacity(content_type_ids.len());
        for (index, id) in content_type_ids.iter().enumerate() {
            io.output(format!("{} of {}", index + 1, content_type_ids.len()));
            let path = editor_interface_path(&self.settings.environment_id, id);
            match api.fetch_one(&path).await {
                Ok(interface) => interfaces.push(interface),
                Err(SpacedumpError::Api(ApiError::NotFound(_))) => {
                    io.log()
                        .warning(format!("No editor interface found for content type {id}"));
                }
                Err(e) => return Err(e),
            }
        }

        let collection = Collection::EditorInterfaces;
        log_collection_fetched!(collection, interfaces.len());
        io.log()
            .info(format!("Fetched {} {}", interfaces.len(), collection.label()));
        ctx.extend_collection(collection.key(), interfaces);
        Ok(StepOutcome::Done)
    }
}
