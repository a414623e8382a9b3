//! Export coordinator - main orchestrator for the export process
//!
//! Assembles the pipeline from configuration, runs it against a fresh
//! context and run log, then hands the settled run to the reporter.

use crate::config::SpacedumpConfig;
use crate::core::pipeline::{renderer_for, ExportContext, ExportData, PipelineExecutor, Step, StepRenderer};
use crate::core::report::{ReportOptions, Reporter};
use crate::core::runlog::RunLog;
use crate::core::tasks::{download_assets, fetch_space, init_client, write_snapshot};
use crate::domain::Result;
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    config: SpacedumpConfig,
    renderer: Arc<dyn StepRenderer>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// The renderer follows `export.use_verbose_renderer`.
    pub fn new(config: SpacedumpConfig) -> Self {
        let renderer = renderer_for(config.export.use_verbose_renderer);
        Self { config, renderer }
    }

    /// Replaces the progress renderer
    pub fn with_renderer(mut self, renderer: Arc<dyn StepRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &SpacedumpConfig {
        &self.config
    }

    /// The export pipeline, in run order
    pub fn pipeline(&self, content_file: &Path) -> Vec<Step> {
        let space = &self.config.space;
        let export = &self.config.export;
        vec![
            init_client::step(space.clone()),
            fetch_space::step(fetch_space::FetchSettings::from_config(space, export)),
            download_assets::step(export.download_assets, &export.export_dir),
            write_snapshot::step(export.save_file, &export.export_dir, content_file),
        ]
    }

    /// Execute the export, printing the report to stdout
    pub async fn execute_export(&self) -> Result<ExportData> {
        self.execute_export_to(std::io::stdout()).await
    }

    /// Execute the export, printing the report to `out`
    ///
    /// # Errors
    ///
    /// Returns the aggregate failure when any error was recorded during the
    /// run, including the failure that aborted the pipeline.
    pub async fn execute_export_to<W: Write>(&self, out: W) -> Result<ExportData> {
        let started = Instant::now();
        let started_at = Utc::now();
        let content_file = self.config.content_file_path(started_at);
        let error_log_file = self.config.error_log_path(started_at);

        tracing::info!(
            space_id = %self.config.space.space_id,
            environment_id = %self.config.space.environment_id,
            content_file = %content_file.display(),
            "Starting export"
        );

        let log = RunLog::new();
        let mut ctx = ExportContext::new();
        let steps = self.pipeline(&content_file);
        let executor = PipelineExecutor::new(log.clone(), Arc::clone(&self.renderer));
        let run = executor.run(&steps, &mut ctx).await;

        let mut reporter = Reporter::new(
            out,
            ReportOptions {
                save_file: self.config.export.save_file,
                content_file,
                error_log_file,
                started_at: started,
            },
        );
        let result = reporter.finish(ctx, &log, run);

        match &result {
            Ok(data) => tracing::info!(
                collections = data.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Export completed"
            ),
            Err(e) => tracing::warn!(error = %e, "Export finished with errors"),
        }
        result
    }
}
