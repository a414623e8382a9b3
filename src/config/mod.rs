//! Configuration management for Spacedump.
//!
//! Spacedump reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SPACEDUMP_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "warn"
//!
//! [space]
//! space_id = "yadj1kx9rmg0"
//! environment_id = "master"
//! management_token = "${SPACEDUMP_MANAGEMENT_TOKEN}"
//!
//! [export]
//! include_drafts = false
//! download_assets = true
//! export_dir = "./export"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use spacedump::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("spacedump.toml")?;
//! println!("Space: {}", config.space.space_id);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, ExportConfig, LoggingConfig, SpaceConfig, SpacedumpConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
