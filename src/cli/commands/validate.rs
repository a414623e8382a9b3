//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Spacedump configuration file.

use crate::config::{load_config, SpacedumpConfig};
use chrono::Utc;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!();
                print_summary(&config);
                Ok(0)
            }
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                Ok(2) // Configuration error exit code
            }
        }
    }
}

fn print_summary(config: &SpacedumpConfig) {
    let export = &config.export;
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Space: {}", config.space.space_id);
    println!("  Environment: {}", config.space.environment_id);
    println!("  Host: {}", config.space.host);
    println!(
        "  Delivery API: {}",
        if config.space.delivery_token.is_some() {
            config.space.delivery_host.as_str()
        } else {
            "not used"
        }
    );
    println!("  Export Directory: {}", export.export_dir);
    println!(
        "  Snapshot File: {}",
        config.content_file_path(Utc::now()).display()
    );
    println!("  Page Size: {}", export.max_allowed_limit);
    println!("  Include Drafts: {}", export.include_drafts);
    println!("  Include Archived: {}", export.include_archived);
    println!("  Download Assets: {}", export.download_assets);
    println!("  Save File: {}", export.save_file);

    let skipped: Vec<&str> = [
        (export.skip_content_model, "content model"),
        (export.skip_content, "content"),
        (export.skip_webhooks, "webhooks"),
        (export.skip_roles, "roles"),
    ]
    .into_iter()
    .filter_map(|(skip, name)| skip.then_some(name))
    .collect();
    if !skipped.is_empty() {
        println!("  Skipped: {}", skipped.join(", "));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[space]\nspace_id = \"abc\"\nmanagement_token = \"t\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_two() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[space]\nspace_id = \"abc\"\nmanagement_token = \"\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
