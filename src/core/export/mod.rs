//! Export orchestration
//!
//! This module wires configuration, the step pipeline and the end-of-run
//! reporter into one export run.

pub mod coordinator;

pub use coordinator::ExportCoordinator;
