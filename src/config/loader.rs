//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SpacedumpConfig;
use super::secret::secret_string;
use crate::domain::errors::SpacedumpError;
use crate::domain::ids::{EnvironmentId, SpaceId};
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SpacedumpConfig
/// 4. Applies environment variable overrides (SPACEDUMP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use spacedump::config::loader::load_config;
///
/// let config = load_config("spacedump.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SpacedumpConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SpacedumpError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SpacedumpError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SpacedumpError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Parses configuration text after `${VAR}` substitution, without overrides or validation
pub fn parse_config(contents: &str) -> Result<SpacedumpConfig> {
    let contents = substitute_env_vars(contents)?;
    toml::from_str(&contents)
        .map_err(|e| SpacedumpError::Configuration(format!("Failed to parse TOML: {e}")))
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SpacedumpError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Applies environment variable overrides using SPACEDUMP_* prefix
///
/// Environment variables follow the pattern: SPACEDUMP_<SECTION>_<KEY>
/// For example: SPACEDUMP_SPACE_ID, SPACEDUMP_EXPORT_DOWNLOAD_ASSETS
fn apply_env_overrides(config: &mut SpacedumpConfig) -> Result<()> {
    if let Ok(val) = std::env::var("SPACEDUMP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Space overrides
    if let Ok(val) = std::env::var("SPACEDUMP_SPACE_ID") {
        config.space.space_id = SpaceId::new(val).map_err(SpacedumpError::Configuration)?;
    }
    if let Ok(val) = std::env::var("SPACEDUMP_ENVIRONMENT_ID") {
        config.space.environment_id =
            EnvironmentId::new(val).map_err(SpacedumpError::Configuration)?;
    }
    if let Ok(val) = std::env::var("SPACEDUMP_MANAGEMENT_TOKEN") {
        config.space.management_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("SPACEDUMP_DELIVERY_TOKEN") {
        config.space.delivery_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("SPACEDUMP_SPACE_HOST") {
        config.space.host = val;
    }

    // Export overrides
    if let Some(flag) = env_flag("SPACEDUMP_EXPORT_INCLUDE_DRAFTS") {
        config.export.include_drafts = flag;
    }
    if let Some(flag) = env_flag("SPACEDUMP_EXPORT_INCLUDE_ARCHIVED") {
        config.export.include_archived = flag;
    }
    if let Some(flag) = env_flag("SPACEDUMP_EXPORT_DOWNLOAD_ASSETS") {
        config.export.download_assets = flag;
    }
    if let Some(flag) = env_flag("SPACEDUMP_EXPORT_SAVE_FILE") {
        config.export.save_file = flag;
    }
    if let Ok(val) = std::env::var("SPACEDUMP_EXPORT_DIR") {
        config.export.export_dir = val;
    }
    if let Ok(val) = std::env::var("SPACEDUMP_EXPORT_MAX_ALLOWED_LIMIT") {
        if let Ok(limit) = val.parse() {
            config.export.max_allowed_limit = limit;
        }
    }

    // Logging overrides
    if let Some(flag) = env_flag("SPACEDUMP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = flag;
    }
    if let Ok(val) = std::env::var("SPACEDUMP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
