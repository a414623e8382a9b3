// Spacedump - Content space export tool
// Copyright (c) 2025 Spacedump Contributors
// Licensed under the MIT License

//! # Spacedump - content space export
//!
//! Spacedump exports the content of a remote content space (content model,
//! entries, assets, locales, webhooks, roles) into one JSON snapshot, and can
//! download the binary asset files alongside it.
//!
//! ## Overview
//!
//! An export is a pipeline of titled steps run strictly in order against one
//! shared context:
//!
//! 1. **Initialize client** - management API client, plus a delivery API
//!    client when a delivery token is configured
//! 2. **Fetching data from space** - one nested step per collection, each
//!    skippable through configuration
//! 3. **Download assets** - optional, bounded concurrency
//! 4. **Write export log file** - directory probe, creation, JSON snapshot
//!
//! Steps record warnings and errors on a shared run log. When the pipeline
//! settles, the reporter prints the exported entity counts and every warning
//! or error, writes the error log file when errors were recorded, and
//! resolves the run.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline, run log, export tasks, reporting
//! - [`adapters`] - Space API integration
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spacedump::config::load_config;
//! use spacedump::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("spacedump.toml")?;
//!     let coordinator = ExportCoordinator::new(config);
//!
//!     let data = coordinator.execute_export().await?;
//!     println!("Exported {} collections", data.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom pipelines
//!
//! The pipeline types are usable on their own:
//!
//! ```rust
//! use spacedump::core::pipeline::{
//!     ExportContext, PipelineExecutor, SilentRenderer, Step, StepOutcome,
//! };
//! use spacedump::core::runlog::RunLog;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> spacedump::domain::Result<()> {
//! let steps = vec![
//!     Step::sync("Probe", |ctx, _| {
//!         ctx.log_directory_exists = true;
//!         Ok(StepOutcome::Done)
//!     }),
//!     Step::sync("Create", |_, io| {
//!         io.log().info("created");
//!         Ok(StepOutcome::Done)
//!     })
//!     .skip_if(|ctx| ctx.log_directory_exists),
//! ];
//!
//! let log = RunLog::new();
//! let executor = PipelineExecutor::new(log.clone(), Arc::new(SilentRenderer));
//! let mut ctx = ExportContext::new();
//! executor.run(&steps, &mut ctx).await?;
//! assert!(log.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`]. A run that recorded
//! errors fails with [`domain::SpacedumpError::Aggregate`], which carries
//! every error entry of the run log.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
