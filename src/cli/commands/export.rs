//! Export command implementation
//!
//! This module implements the `export` command, which writes a JSON snapshot
//! of a space and optionally downloads its asset files.

use crate::config::{load_config, secret_string, SpacedumpConfig};
use crate::core::export::ExportCoordinator;
use crate::domain::ids::{EnvironmentId, SpaceId};
use crate::domain::SpacedumpError;
use clap::Args;

/// Arguments for the export command
///
/// Every flag overrides the matching configuration value.
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the space to export
    #[arg(long)]
    pub space_id: Option<String>,

    /// Override the environment to export
    #[arg(long)]
    pub environment_id: Option<String>,

    /// Override the management token
    #[arg(long, env = "SPACEDUMP_MANAGEMENT_TOKEN", hide_env_values = true)]
    pub management_token: Option<String>,

    /// Read published entries through the delivery API with this token
    #[arg(long, env = "SPACEDUMP_DELIVERY_TOKEN", hide_env_values = true)]
    pub delivery_token: Option<String>,

    /// Directory for the snapshot, asset files and error log
    #[arg(long)]
    pub export_dir: Option<String>,

    /// Snapshot file name, relative to the export directory
    #[arg(long)]
    pub content_file: Option<String>,

    /// Error log path
    #[arg(long)]
    pub error_log_file: Option<String>,

    /// Keep entries and assets that were never published
    #[arg(long)]
    pub include_drafts: bool,

    /// Keep archived entries and assets
    #[arg(long)]
    pub include_archived: bool,

    /// Skip content types, tags, editor interfaces and locales
    #[arg(long)]
    pub skip_content_model: bool,

    /// Skip entries and assets
    #[arg(long)]
    pub skip_content: bool,

    /// Skip webhooks
    #[arg(long)]
    pub skip_webhooks: bool,

    /// Skip roles
    #[arg(long)]
    pub skip_roles: bool,

    /// Entry filter as key=value (repeatable)
    #[arg(long = "query-entries", value_name = "KEY=VALUE")]
    pub query_entries: Vec<String>,

    /// Asset filter as key=value (repeatable)
    #[arg(long = "query-assets", value_name = "KEY=VALUE")]
    pub query_assets: Vec<String>,

    /// Page size used when listing collections (1-1000)
    #[arg(long)]
    pub max_allowed_limit: Option<usize>,

    /// Download asset files into the export directory
    #[arg(long)]
    pub download_assets: bool,

    /// Do not write the snapshot to disk
    #[arg(long)]
    pub no_save_file: bool,

    /// Print one line per step instead of live progress
    #[arg(long)]
    pub verbose: bool,
}

impl ExportArgs {
    /// Applies the command-line overrides to a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns a message when an identifier override is malformed.
    pub fn apply_overrides(&self, config: &mut SpacedumpConfig) -> Result<(), String> {
        if let Some(space_id) = &self.space_id {
            tracing::info!(space_id = %space_id, "Overriding space from CLI");
            config.space.space_id = SpaceId::new(space_id.as_str())?;
        }
        if let Some(environment_id) = &self.environment_id {
            tracing::info!(environment_id = %environment_id, "Overriding environment from CLI");
            config.space.environment_id = EnvironmentId::new(environment_id.as_str())?;
        }
        if let Some(token) = &self.management_token {
            config.space.management_token = secret_string(token.clone());
        }
        if let Some(token) = &self.delivery_token {
            config.space.delivery_token = Some(secret_string(token.clone()));
        }

        let export = &mut config.export;
        if let Some(dir) = &self.export_dir {
            export.export_dir = dir.clone();
        }
        if let Some(file) = &self.content_file {
            export.content_file = Some(file.clone());
        }
        if let Some(file) = &self.error_log_file {
            export.error_log_file = Some(file.clone());
        }
        if let Some(limit) = self.max_allowed_limit {
            export.max_allowed_limit = limit;
        }
        if !self.query_entries.is_empty() {
            export.query_entries = self.query_entries.clone();
        }
        if !self.query_assets.is_empty() {
            export.query_assets = self.query_assets.clone();
        }

        // Switches only ever turn a behavior on
        export.include_drafts |= self.include_drafts;
        export.include_archived |= self.include_archived;
        export.skip_content_model |= self.skip_content_model;
        export.skip_content |= self.skip_content;
        export.skip_webhooks |= self.skip_webhooks;
        export.skip_roles |= self.skip_roles;
        export.download_assets |= self.download_assets;
        export.use_verbose_renderer |= self.verbose;
        if self.no_save_file {
            export.save_file = false;
        }

        Ok(())
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = self
            .apply_overrides(&mut config)
            .and_then(|()| config.validate())
        {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        println!(
            "Exporting space {} (environment {})",
            config.space.space_id, config.space.environment_id
        );
        println!();

        let coordinator = ExportCoordinator::new(config);
        let exit_code = match coordinator.execute_export().await {
            Ok(_) => 0,
            Err(SpacedumpError::Aggregate(multi)) => {
                tracing::error!(errors = multi.len(), "Export failed");
                eprintln!("{}: {multi}", crate::domain::MultiError::NAME);
                1
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                5 // Fatal error exit code
            }
        };

        Ok(exit_code)
    }
}
