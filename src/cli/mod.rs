//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Spacedump using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Console log level used when neither the flag nor a loadable config sets one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Spacedump - export a content space to a JSON snapshot
#[derive(Parser, Debug)]
#[command(name = "spacedump")]
#[command(version, about, long_about = None)]
#[command(author = "Spacedump Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "spacedump.toml", env = "SPACEDUMP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SPACEDUMP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging section for the process
    ///
    /// `--log-level` wins over `application.log_level`. When the config file
    /// cannot be loaded (missing, or `init` has not run yet) the defaults are
    /// used; the command itself reports the configuration error.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        match load_config(&self.config) {
            Ok(config) => (
                self.log_level
                    .clone()
                    .unwrap_or(config.application.log_level),
                config.logging,
            ),
            Err(_) => (
                self.log_level
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                LoggingConfig::default(),
            ),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a space to a JSON snapshot
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["spacedump", "export"]);
        assert_eq!(cli.config, "spacedump.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["spacedump", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["spacedump", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_flags() {
        let cli = Cli::parse_from([
            "spacedump",
            "export",
            "--environment-id",
            "staging",
            "--query-entries",
            "content_type=post",
            "--query-entries",
            "fields.slug=home",
            "--download-assets",
            "--no-save-file",
            "--verbose",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.environment_id.as_deref(), Some("staging"));
        assert_eq!(args.query_entries.len(), 2);
        assert!(args.download_assets);
        assert!(args.no_save_file);
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["spacedump", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_logging_settings_follow_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[application]\nlog_level = \"debug\"\n[space]\nspace_id = \"abc\"\nmanagement_token = \"t\"\n[logging]\nlocal_enabled = true\nlocal_path = \"diag\"\nlocal_rotation = \"hourly\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["spacedump", "--config", path, "export"]);
        let (level, logging) = cli.logging_settings();
        assert_eq!(level, "debug");
        assert!(logging.local_enabled);
        assert_eq!(logging.local_path, "diag");
        assert_eq!(logging.local_rotation, "hourly");

        let cli = Cli::parse_from(["spacedump", "--config", path, "--log-level", "error", "export"]);
        assert_eq!(cli.logging_settings().0, "error");
    }

    #[test]
    fn test_logging_settings_without_config() {
        let cli = Cli::parse_from(["spacedump", "--config", "/nonexistent/spacedump.toml", "init"]);
        let (level, logging) = cli.logging_settings();
        assert_eq!(level, DEFAULT_LOG_LEVEL);
        assert!(!logging.local_enabled);
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["spacedump", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
