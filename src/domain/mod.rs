//! Domain types for Spacedump.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SpaceId`], [`EnvironmentId`])
//! - **Error types** ([`SpacedumpError`], [`ApiError`], [`MultiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SpacedumpError>`]:
//!
//! ```rust,no_run
//! use spacedump::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = spacedump::config::load_config("spacedump.toml")?;
//!     println!("{}", config.space.space_id);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

pub use errors::{ApiError, MultiError, SpacedumpError};
pub use ids::{EnvironmentId, SpaceId};
pub use result::Result;
