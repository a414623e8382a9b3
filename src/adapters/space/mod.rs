//! Space API adapter
//!
//! Read access to a remote content space: the [`ContentApi`] trait, its
//! reqwest implementation, and the collection/path models shared by the
//! export tasks.

pub mod api;
pub mod client;
pub mod models;

pub use api::ContentApi;
pub use client::HttpContentApi;
pub use models::{Collection, Page, PageQuery};
