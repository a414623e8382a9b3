//! HTTP implementation of the content API
//!
//! One [`HttpContentApi`] talks to one host (management or delivery) on
//! behalf of one space, authenticating every request with a bearer token.

use super::api::ContentApi;
use super::models::{Page, PageQuery};
use crate::config::{SecretString, SpaceConfig};
use crate::domain::{ApiError, Result, SpacedumpError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed [`ContentApi`]
pub struct HttpContentApi {
    /// `{scheme}://{host}/spaces/{space_id}`
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    token: SecretString,
}

impl HttpContentApi {
    /// Creates a client for an explicit space base URL
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: SecretString, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("spacedump/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SpacedumpError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            token,
        })
    }

    /// Management API client for the configured space
    pub fn management(config: &SpaceConfig) -> Result<Self> {
        Self::new(
            space_url(config, &config.host),
            config.management_token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Delivery API client, when a delivery token is configured
    pub fn delivery(config: &SpaceConfig) -> Result<Option<Self>> {
        config
            .delivery_token
            .as_ref()
            .map(|token| {
                Self::new(
                    space_url(config, &config.delivery_host),
                    token.clone(),
                    Duration::from_secs(config.timeout_seconds),
                )
            })
            .transpose()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Response> {
        tracing::debug!(url = %url, params = query.len(), "GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose_secret().as_str())
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(e, url))?;

        check_status(response).await
    }
}

fn space_url(config: &SpaceConfig, host: &str) -> String {
    format!("{}://{}/spaces/{}", config.scheme(), host, config.space_id)
}

fn transport_error(err: reqwest::Error, url: &str) -> SpacedumpError {
    if err.is_timeout() {
        ApiError::Timeout(url.to_string()).into()
    } else {
        ApiError::ConnectionFailed(format!("{url}: {err}")).into()
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), url = %url, "Request rejected");
    Err(ApiError::from_status(status.as_u16(), format!("{url}: {body}")).into())
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn fetch_page(&self, path: &str, query: &PageQuery) -> Result<Page> {
        let url = self.url(path);
        let response = self.get(&url, &query.to_pairs()).await?;
        response
            .json::<Page>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{url}: {e}")).into())
    }

    async fn fetch_one(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        let response = self.get(&url, &[]).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{url}: {e}")).into())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        // Asset files are public; the space token must not leak to the file host
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e, url))?;
        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, url))?;
        Ok(bytes.to_vec())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
