//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "spacedump.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(()) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set space_id in {}", self.output);
                println!("  2. Put SPACEDUMP_MANAGEMENT_TOKEN in your environment or a .env file");
                println!("  3. Validate configuration: spacedump validate-config");
                println!("  4. Run export: spacedump export");
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Spacedump Configuration File

[space]
space_id = "your-space-id"
environment_id = "master"
management_token = "${SPACEDUMP_MANAGEMENT_TOKEN}"

[export]
export_dir = "./export"
download_assets = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Spacedump Configuration File
#
# Every option with its default value. Values of the form ${VAR} are read
# from the environment (a .env file next to the binary is loaded first).
# Any value can also be overridden with SPACEDUMP_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level of diagnostics on stderr (trace, debug, info, warn, error).
# The --log-level flag takes precedence.
log_level = "warn"

# ============================================================================
# Space Connection
# ============================================================================
[space]
# Space to export (required)
space_id = "your-space-id"

# Environment inside the space
environment_id = "master"

# Management API token (required, use an environment variable)
management_token = "${SPACEDUMP_MANAGEMENT_TOKEN}"

# Delivery API token. When set, entries are read from the delivery API,
# so only published entries are exported.
# delivery_token = "${SPACEDUMP_DELIVERY_TOKEN}"

# API hosts
host = "api.contentful.com"
delivery_host = "cdn.contentful.com"

# Per-request timeout in seconds (1-600)
timeout_seconds = 60

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Keep entries and assets that were never published
include_drafts = false

# Keep archived entries and assets
include_archived = false

# Skip content types, tags, editor interfaces and locales
skip_content_model = false

# Skip entries and assets
skip_content = false

# Skip space-level resources (only exported for the master environment)
skip_webhooks = false
skip_roles = false

# Page size used when listing collections (1-1000)
max_allowed_limit = 1000

# Filters passed to the entries and assets listings
query_entries = []
query_assets = []

# Download asset files into the export directory
download_assets = false

# Write the snapshot to disk
save_file = true

# Directory for the snapshot, asset files and error log
export_dir = "./export"

# Snapshot file name (default: spacedump-<space>-<environment>-<timestamp>.json)
# content_file = "snapshot.json"

# Error log path (default: <export_dir>/spacedump-error-log-<space>-<timestamp>.json)
# error_log_file = "./export/errors.json"

# Print one line per step instead of live progress
use_verbose_renderer = false

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
