//! Content API trait definition
//!
//! The export tasks talk to a space only through [`ContentApi`], so they can
//! be exercised against an in-memory implementation and the HTTP client
//! stays swappable.

use super::models::{Page, PageQuery};
use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Read access to one space
///
/// Paths are relative to the space, e.g. `environments/master/entries`.
/// Implementations do not retry; a failed request is returned as is.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetches one page of a list endpoint
    ///
    /// # Errors
    ///
    /// Returns an API error for transport failures and non-success statuses.
    async fn fetch_page(&self, path: &str, query: &PageQuery) -> Result<Page>;

    /// Fetches a single resource
    async fn fetch_one(&self, path: &str) -> Result<Value>;

    /// Downloads a binary file from an absolute URL
    async fn download(&self, url: &str) -> Result<Vec<u8>>;

    /// Base URL of the space, used in logs
    fn base_url(&self) -> &str;
}
