//! Logging and observability
//!
//! Operator diagnostics go through `tracing`:
//! - Console output on stderr (stdout is reserved for the export report)
//! - Optional JSON file logging with rotation
//!
//! The user-facing run log (warnings and errors shown at the end of an
//! export) is a separate artifact, see [`crate::core::runlog`].
//!
//! # Example
//!
//! ```no_run
//! use spacedump::logging::init_logging;
//! use spacedump::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log that a collection finished downloading
///
/// # Example
///
/// ```no_run
/// use spacedump::log_collection_fetched;
///
/// log_collection_fetched!("entries", 42);
/// ```
#[macro_export]
macro_rules! log_collection_fetched {
    ($collection:expr, $count:expr) => {
        tracing::info!(
            collection = %$collection,
            count = $count,
            "Collection fetched"
        );
    };
}
