//! HTTP fetcher implementation
//!
//! This module handles retrieving result pages, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - Building the per-page query URL
//! - Classifying transport failures
//!
//! No retries happen here. A failed page is reported to the caller as-is.

use crate::config::{HttpConfig, UserAgentConfig};
use crate::search::query::page_url;
use crate::search::types::{PageNumber, RawDocument, SearchTerm};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Retrieves the raw document for one page of a search
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `page` of the results for `term`
    async fn fetch(&self, term: &SearchTerm, page: PageNumber) -> Result<RawDocument, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `http` - Transport timeouts
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use deck_search::config::{HttpConfig, UserAgentConfig};
/// use deck_search::search::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        user_agent.crawler_name, user_agent.crawler_version, user_agent.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches search result pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Creates a fetcher for the given search endpoint
    pub fn new(client: Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Sends a GET for the page and classifies the response
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 2xx | `Ok(RawDocument)` |
    /// | Any other status | `FetchError::Status` |
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection failure | `FetchError::Connect` |
    /// | Body read failure | `FetchError::Body` |
    async fn fetch(&self, term: &SearchTerm, page: PageNumber) -> Result<RawDocument, FetchError> {
        let url = page_url(&self.base_url, term, page);
        let url_str = url.to_string();
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        let status = response.status();
        tracing::debug!(
            "GET page {} returned {} in {:?}",
            page,
            status.as_u16(),
            started.elapsed()
        );

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url_str.clone(),
            message: e.to_string(),
        })?;

        Ok(RawDocument::new(url_str, body))
    }
}

/// Maps a reqwest send error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
