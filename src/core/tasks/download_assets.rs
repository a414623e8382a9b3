//! "Download assets" step
//!
//! Downloads the binary file of every locale of every exported asset into
//! the export directory, mirroring the file host's URL layout:
//! `//images.example.net/a/b/logo.png` lands at
//! `<export_dir>/images.example.net/a/b/logo.png`.

use crate::adapters::space::models::record_id;
use crate::adapters::space::{Collection, ContentApi};
use crate::core::pipeline::{
    AssetDownloadSummary, ExportContext, Step, StepAction, StepIo, StepOutcome,
};
use crate::domain::{Result, SpacedumpError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use url::Url;

pub const TITLE: &str = "Download assets";

/// Concurrent downloads in flight
pub const DOWNLOAD_CONCURRENCY: usize = 6;

/// Skipped unless downloads are enabled and assets were exported
pub fn step(download_assets: bool, export_dir: impl Into<PathBuf>) -> Step {
    Step::action(
        TITLE,
        DownloadAssets {
            export_dir: export_dir.into(),
        },
    )
    .skip_if(move |ctx| !download_assets || !ctx.has_collection(Collection::Assets.key()))
}

struct DownloadAssets {
    export_dir: PathBuf,
}

enum Job {
    MissingFile { asset_id: String },
    MissingUrl { asset_id: String, locale: String },
    Download { asset_id: String, locale: String, url: String },
}

enum Outcome {
    Success,
    Warning,
    Error,
}

/// Lists the work for every asset and locale
fn plan(assets: &[Value]) -> Vec<Job> {
    let mut jobs = Vec::new();
    for asset in assets {
        let asset_id = record_id(asset).unwrap_or("<unknown>").to_string();
        let Some(files) = asset.pointer("/fields/file").and_then(Value::as_object) else {
            jobs.push(Job::MissingFile { asset_id });
            continue;
        };
        for (locale, file) in files {
            match file.get("url").and_then(Value::as_str) {
                Some(url) => jobs.push(Job::Download {
                    asset_id: asset_id.clone(),
                    locale: locale.clone(),
                    url: url.to_string(),
                }),
                None => jobs.push(Job::MissingUrl {
                    asset_id: asset_id.clone(),
                    locale: locale.clone(),
                }),
            }
        }
    }
    jobs
}

/// Absolute download URL; protocol-relative URLs use https
pub fn absolute_url(raw: &str) -> Result<Url> {
    let raw = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };
    Url::parse(&raw).map_err(|e| SpacedumpError::Other(format!("Invalid asset URL '{raw}': {e}")))
}

/// Local destination of a downloaded file
pub fn local_path(export_dir: &Path, url: &Url) -> Result<PathBuf> {
    let host = url
        .host_str()
        .ok_or_else(|| SpacedumpError::Other(format!("Asset URL has no host: {url}")))?;
    let relative = Path::new(url.path().trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(SpacedumpError::Other(format!(
            "Asset URL path escapes the export directory: {url}"
        )));
    }
    Ok(export_dir.join(host).join(relative))
}

async fn download(api: &dyn ContentApi, export_dir: &Path, raw_url: &str) -> Result<PathBuf> {
    let url = absolute_url(raw_url)?;
    let destination = local_path(export_dir, &url)?;
    let bytes = api.download(url.as_str()).await?;
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&destination, bytes).await?;
    Ok(destination)
}

#[async_trait]
impl StepAction for DownloadAssets {
    async fn run(&self, ctx: &mut ExportContext, io: &StepIo) -> Result<StepOutcome> {
        let api = ctx.client()?;
        let jobs = plan(ctx.collection(Collection::Assets.key()).unwrap_or_default());
        let total = jobs.len();
        let log = io.log().clone();

        tracing::info!(files = total, concurrency = DOWNLOAD_CONCURRENCY, "Downloading asset files");

        let outcomes: Vec<Outcome> = stream::iter(jobs)
            .map(|job| {
                let api = Arc::clone(&api);
                let log = log.clone();
                let export_dir = self.export_dir.clone();
                async move {
                    match job {
                        Job::MissingFile { asset_id } => {
                            log.warning(format!("Asset {asset_id} has no file(s)"));
                            Outcome::Warning
                        }
                        Job::MissingUrl { asset_id, locale } => {
                            log.warning(format!(
                                "Asset {asset_id} has no url for locale {locale}"
                            ));
                            Outcome::Error
                        }
                        Job::Download { asset_id, locale, url } => {
                            match download(api.as_ref(), &export_dir, &url).await {
                                Ok(path) => {
                                    tracing::debug!(path = %path.display(), "Asset file saved");
                                    Outcome::Success
                                }
                                Err(e) => {
                                    log.warning(format!(
                                        "Error downloading asset {asset_id} ({locale}) from {url}: {e}"
                                    ));
                                    Outcome::Error
                                }
                            }
                        }
                    }
                }
            })
            .buffer_unordered(DOWNLOAD_CONCURRENCY)
            .collect()
            .await;

        let mut summary = AssetDownloadSummary::default();
        for outcome in &outcomes {
            match outcome {
                Outcome::Success => summary.success_count += 1,
                Outcome::Warning => summary.warning_count += 1,
                Outcome::Error => summary.error_count += 1,
            }
        }
        io.output(format!("Processed {} of {total} files", outcomes.len()));

        tracing::info!(
            success = summary.success_count,
            warnings = summary.warning_count,
            errors = summary.error_count,
            "Asset downloads finished"
        );
        io.log().info(format!(
            "Downloaded {} asset files",
            summary.success_count
        ));
        ctx.asset_downloads = Some(summary);
        Ok(StepOutcome::Done)
    }
}
