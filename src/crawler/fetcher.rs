//! HTTP fetcher
//!
//! Retrieval of a single page: a fixed per-request timeout, transparent
//! redirect following, and capture of the final status code and body. Error
//! responses (4xx/5xx) are successes from the fetcher's point of view; their
//! bodies still get parsed and recorded. Only network-level failures
//! (connection refused, DNS, timeout) are errors, and those are soft: the
//! caller drops the URL and continues.

use crate::config::FetchSection;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// A fetched page: final status and body after redirects, plus latency
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the response actually came from, after redirects
    pub final_url: Url,

    /// Final HTTP status code
    pub status_code: u16,

    /// Raw response body
    pub body: String,

    /// Elapsed fetch time in seconds
    pub load_time: f64,
}

/// A soft, per-URL fetch failure
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
}

/// A page retrieval capability
///
/// The traversal controller is generic over this trait so the plain-HTTP
/// fetcher can be swapped for a rendered-DOM fetcher (or a test double)
/// without touching the crawl logic. [`HttpFetcher`] is the guaranteed
/// fallback implementation.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds the HTTP client used for all requests in one crawl
pub fn build_http_client(config: &FetchSection) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Plain-HTTP fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchSection) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let started = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage {
            final_url,
            status_code,
            body,
            load_time: started.elapsed().as_secs_f64(),
        })
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            source: error,
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchSection;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetchSection::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_fetcher_construction() {
        let fetcher = HttpFetcher::new(&FetchSection::default());
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_soft_error() {
        let fetcher = HttpFetcher::new(&FetchSection::default()).unwrap();
        // Port 1 is essentially never listening
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let result = fetcher.fetch(&url).await;
        assert!(matches!(
            result,
            Err(FetchError::Connect { .. }) | Err(FetchError::Network { .. })
        ));
    }
}
