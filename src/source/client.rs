//! Generic paginated HTTP GET traversal against the upstream API
//!
//! [`PageFetcher`] knows nothing about playlists or videos - it fetches one
//! [`Page`] of raw JSON items at a time. [`Paginator`] drives a full traversal
//! one page per call, so the next page is only requested after the caller has
//! consumed the current one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::YoutubeConfig;

/// Playlist enumeration endpoint.
pub const PLAYLIST_ITEMS_ENDPOINT: &str = "playlistItems";
/// Single-video lookup endpoint.
pub const VIDEOS_ENDPOINT: &str = "videos";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to '{endpoint}' failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{endpoint}' returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed JSON body from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API client configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// One paginated response unit.
///
/// `next_page_token` is `None` on the terminal page of a traversal. The
/// upstream contract distinguishes an absent token from an empty-string one,
/// so the field stays an `Option` rather than defaulting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    pub next_page_token: Option<String>,
}

/// Fetches one page of an externally paginated collection.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page. `page_token` is omitted from the request entirely
    /// when `None`, never sent as an empty string.
    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        page_token: Option<&str>,
    ) -> Result<Page>;
}

/// [`PageFetcher`] backed by the real upstream HTTP API.
///
/// Every request carries the API key merged with the caller's fixed query
/// parameters.
pub struct HttpPageFetcher {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpPageFetcher {
    pub fn new(config: &YoutubeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| FetchError::InvalidConfig("API key is not set".to_string()))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        page_token: Option<&str>,
    ) -> Result<Page> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query: Vec<(&str, &str)> = vec![("key", self.api_key.as_str())];
        for (name, value) in params {
            query.push((name, value.as_str()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;

        debug!(endpoint, payload = %body, "fetched page");

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Caller-driven cursor over all pages of one endpoint traversal.
///
/// Holds at most the continuation token between calls; restarting a traversal
/// means constructing a fresh `Paginator`.
pub struct Paginator {
    fetcher: Arc<dyn PageFetcher>,
    endpoint: &'static str,
    params: Vec<(&'static str, String)>,
    token: Option<String>,
    done: bool,
}

impl Paginator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        endpoint: &'static str,
        params: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            fetcher,
            endpoint,
            params,
            token: None,
            done: false,
        }
    }

    /// Fetch the next page, or `None` once the terminal page has been
    /// returned. A fetch failure stops the traversal and propagates; it never
    /// silently truncates.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .fetcher
            .fetch_page(self.endpoint, &self.params, self.token.as_deref())
            .await?;

        self.token = page.next_page_token.clone();
        if self.token.is_none() {
            self.done = true;
        }

        Ok(Some(page))
    }
}
