//! Configuration schema types
//!
//! This module defines the configuration structure for Spacedump.

use crate::config::SecretString;
use crate::domain::ids::{EnvironmentId, SpaceId};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Spacedump configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacedumpConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Space connection settings
    pub space: SpaceConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SpacedumpConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.space.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Path of the JSON snapshot written at the end of a successful run
    pub fn content_file_path(&self, started_at: DateTime<Utc>) -> PathBuf {
        let dir = PathBuf::from(&self.export.export_dir);
        match &self.export.content_file {
            Some(name) => dir.join(name),
            None => dir.join(format!(
                "spacedump-{}-{}-{}.json",
                self.space.space_id,
                self.space.environment_id,
                started_at.format(FILE_TIMESTAMP_FORMAT)
            )),
        }
    }

    /// Path of the error artifact written when a run fails
    pub fn error_log_path(&self, started_at: DateTime<Utc>) -> PathBuf {
        match &self.export.error_log_file {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.export.export_dir).join(format!(
                "spacedump-error-log-{}-{}.json",
                self.space.space_id,
                started_at.format(FILE_TIMESTAMP_FORMAT)
            )),
        }
    }
}

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error) of the CLI's diagnostics;
    /// `--log-level` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Space connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Space to export
    pub space_id: SpaceId,

    /// Environment inside the space
    #[serde(default)]
    pub environment_id: EnvironmentId,

    /// Management API token (required)
    /// Stored securely in memory and automatically zeroized on drop
    pub management_token: SecretString,

    /// Delivery API token; when set, entries are read from the delivery API
    /// and only published content is exported
    #[serde(default)]
    pub delivery_token: Option<SecretString>,

    /// Management API host
    #[serde(default = "default_host")]
    pub host: String,

    /// Delivery API host
    #[serde(default = "default_delivery_host")]
    pub delivery_host: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Use plain HTTP instead of HTTPS (local mock servers only)
    #[serde(default)]
    pub insecure: bool,
}

impl SpaceConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        // Deserialization bypasses the newtype constructors
        SpaceId::new(self.space_id.as_str())?;
        EnvironmentId::new(self.environment_id.as_str())?;
        if self.management_token.expose_secret().is_blank() {
            return Err("space.management_token cannot be empty".to_string());
        }
        if let Some(token) = &self.delivery_token {
            if token.expose_secret().is_blank() {
                return Err("space.delivery_token cannot be empty when set".to_string());
            }
        }
        if self.host.trim().is_empty() {
            return Err("space.host cannot be empty".to_string());
        }
        if self.delivery_host.trim().is_empty() {
            return Err("space.delivery_host cannot be empty".to_string());
        }
        if self.host.contains("://") || self.delivery_host.contains("://") {
            return Err(
                "space.host and space.delivery_host take a host name, not a URL".to_string(),
            );
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err("space.timeout_seconds must be between 1 and 600".to_string());
        }
        Ok(())
    }

    /// URL scheme used for API requests
    pub fn scheme(&self) -> &'static str {
        if self.insecure {
            "http"
        } else {
            "https"
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Keep entries and assets that were never published
    #[serde(default)]
    pub include_drafts: bool,

    /// Keep archived entries and assets
    #[serde(default)]
    pub include_archived: bool,

    /// Skip content types, tags, editor interfaces and locales
    #[serde(default)]
    pub skip_content_model: bool,

    /// Skip entries and assets
    #[serde(default)]
    pub skip_content: bool,

    /// Skip webhooks
    #[serde(default)]
    pub skip_webhooks: bool,

    /// Skip roles
    #[serde(default)]
    pub skip_roles: bool,

    /// Page size used when listing collections
    #[serde(default = "default_max_allowed_limit")]
    pub max_allowed_limit: usize,

    /// Extra query filters for entries, as `key=value`
    #[serde(default)]
    pub query_entries: Vec<String>,

    /// Extra query filters for assets, as `key=value`
    #[serde(default)]
    pub query_assets: Vec<String>,

    /// Download the binary files of exported assets
    #[serde(default)]
    pub download_assets: bool,

    /// Write the snapshot to disk
    #[serde(default = "default_true")]
    pub save_file: bool,

    /// Directory that receives the snapshot, asset files and error log
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Snapshot file name (relative to export_dir)
    #[serde(default)]
    pub content_file: Option<String>,

    /// Error log path
    #[serde(default)]
    pub error_log_file: Option<String>,

    /// Print one line per step event instead of live spinners
    #[serde(default)]
    pub use_verbose_renderer: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_drafts: false,
            include_archived: false,
            skip_content_model: false,
            skip_content: false,
            skip_webhooks: false,
            skip_roles: false,
            max_allowed_limit: default_max_allowed_limit(),
            query_entries: Vec::new(),
            query_assets: Vec::new(),
            download_assets: false,
            save_file: true,
            export_dir: default_export_dir(),
            content_file: None,
            error_log_file: None,
            use_verbose_renderer: false,
        }
    }
}

impl ExportConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.max_allowed_limit == 0 || self.max_allowed_limit > 1000 {
            return Err(format!(
                "export.max_allowed_limit must be between 1 and 1000, got {}",
                self.max_allowed_limit
            ));
        }
        parse_query_filters(&self.query_entries)
            .map_err(|e| format!("export.query_entries: {e}"))?;
        parse_query_filters(&self.query_assets)
            .map_err(|e| format!("export.query_assets: {e}"))?;
        if self.export_dir.trim().is_empty() {
            return Err("export.export_dir cannot be empty".to_string());
        }
        if let Some(name) = &self.content_file {
            if name.trim().is_empty() {
                return Err("export.content_file cannot be empty when set".to_string());
            }
        }
        Ok(())
    }

    /// Parsed entry filters
    pub fn entry_filters(&self) -> Vec<(String, String)> {
        parse_query_filters(&self.query_entries).unwrap_or_default()
    }

    /// Parsed asset filters
    pub fn asset_filters(&self) -> Vec<(String, String)> {
        parse_query_filters(&self.query_assets).unwrap_or_default()
    }
}

/// Parse `key=value` filters; the value may itself contain `=`
pub fn parse_query_filters(filters: &[String]) -> Result<Vec<(String, String)>, String> {
    filters
        .iter()
        .map(|raw| match raw.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(format!("invalid filter '{raw}', expected key=value")),
        })
        .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "api.contentful.com".to_string()
}

fn default_delivery_host() -> String {
    "cdn.contentful.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_allowed_limit() -> usize {
    1000
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
