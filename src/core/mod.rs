//! Core business logic for Spacedump.
//!
//! # Modules
//!
//! - [`pipeline`] - Ordered, skippable, nestable steps over a shared context
//! - [`runlog`] - Severity-tagged run log shared by every step
//! - [`tasks`] - The concrete export steps
//! - [`report`] - End-of-run report and success/failure decision
//! - [`export`] - Export coordination
//!
//! # Export Workflow
//!
//! 1. **Initialize client**: build the management (and delivery) clients
//! 2. **Fetch**: one nested step per collection, each individually skippable
//! 3. **Download assets** (optional): fetch binary files next to the snapshot
//! 4. **Write**: probe/create the export directory and write the JSON snapshot
//! 5. **Report**: print tables and the run log, write the error log on failure
//!
//! # Example
//!
//! ```rust,no_run
//! use spacedump::config::load_config;
//! use spacedump::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("spacedump.toml")?;
//! let coordinator = ExportCoordinator::new(config);
//!
//! let data = coordinator.execute_export().await?;
//! for (collection, records) in &data {
//!     println!("{collection}: {}", records.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod pipeline;
pub mod report;
pub mod runlog;
pub mod tasks;
