//! Single-shot HTTP GETs that degrade to "no data" instead of failing.

use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "   fetcher";

/// Identifying client header sent with every request.
pub const DEFAULT_USER_AGENT: &str = "vLLM-Wheel-Scraper/1.0";

/// Default upper bound on a single request, connect through body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for listing pages and JSON APIs.
///
/// Every request is attempted exactly once. Failures of any kind (connection errors,
/// timeouts, non-2xx statuses, undecodable bodies) are logged and reported to the caller
/// as `None`, which every probe treats as "this path yielded nothing".
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with the given user agent and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        Self::with_default_headers(user_agent, timeout, HeaderMap::new())
    }

    /// Create a fetcher that also sends `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn with_default_headers(user_agent: &str, timeout: Duration, headers: HeaderMap) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .into_app_err("creating HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a page and decode it as UTF-8 text.
    pub async fn get_text(&self, url: &Url) -> Option<String> {
        match self.try_get_text(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Error fetching {url}: {e:#}");
                None
            }
        }
    }

    /// Fetch a JSON document and deserialize it.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Option<T> {
        let text = self.get_text(url).await?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Error decoding JSON from {url}: {e}");
                None
            }
        }
    }

    async fn try_get_text(&self, url: &Url) -> Result<String> {
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(app_err!("server responded with HTTP {status}"));
        }

        let body = resp.bytes().await?;
        String::from_utf8(body.to_vec()).map_err(|e| app_err!("response body is not valid UTF-8: {e}"))
    }
}
