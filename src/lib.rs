//! Sitegraph: a site crawler that builds a link graph
//!
//! This crate crawls a website starting from a seed URL, fetches and parses
//! each reachable page, and builds a link graph (internal links, backlinks,
//! broken links) plus per-page metadata, bounded by a page budget and a depth
//! limit. The finished [`records::CrawlResult`] is an immutable snapshot meant
//! for downstream report generators.

pub mod config;
pub mod crawler;
pub mod output;
pub mod records;
pub mod url;

use thiserror::Error;

/// Main error type for sitegraph operations
///
/// Only two conditions abort a crawl: a seed URL that is not fetchable at all
/// ([`CrawlError::InvalidSeedUrl`]) and a crawl that produced zero page
/// records ([`CrawlError::EmptyCrawl`]). Per-page fetch and parse failures are
/// soft: they are logged and the URL is dropped from further expansion.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL {url}: {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("Crawl of {seed} produced no pages")]
    EmptyCrawl { seed: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for sitegraph operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{crawl, crawl_with_fetcher, Fetch, HttpFetcher};
pub use records::{CrawlResult, CrawlStats, LinkRecord, PageRecord};
pub use crate::url::{normalize_url, parse_and_normalize, CrawlScope};
