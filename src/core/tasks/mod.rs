//! Export tasks
//!
//! The concrete steps of an export run, in pipeline order:
//!
//! 1. [`init_client`] - builds the API clients
//! 2. [`fetch_space`] - expands into one fetch step per collection
//! 3. [`download_assets`] - downloads asset files next to the snapshot
//! 4. [`write_snapshot`] - writes the JSON snapshot to disk

pub mod download_assets;
pub mod fetch_space;
pub mod init_client;
pub mod write_snapshot;
