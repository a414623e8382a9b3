//! External system integrations for Spacedump.
//!
//! - [`space`] - content space management/delivery API
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export tasks
//! can be tested against in-memory implementations.
//!
//! ```rust,no_run
//! use spacedump::adapters::space::{ContentApi, HttpContentApi, PageQuery};
//! use spacedump::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("spacedump.toml")?;
//! let api = HttpContentApi::management(&config.space)?;
//! let page = api
//!     .fetch_page("environments/master/locales", &PageQuery::first(100))
//!     .await?;
//! println!("{} locales", page.total);
//! # Ok(())
//! # }
//! ```

pub mod space;
