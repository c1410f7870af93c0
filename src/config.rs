//! Crawl configuration
//!
//! Configuration can come from a TOML file, from CLI flags, or from the
//! defaults below. TOML keys use kebab-case.

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration for a crawl invocation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlConfig {
    #[serde(default)]
    pub crawl: CrawlSection,

    #[serde(default)]
    pub fetch: FetchSection,
}

/// Crawl bounds and classification options
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSection {
    /// Maximum number of pages to fetch (the budget)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Configured maximum crawl depth from the seed.
    /// The runtime depth limit is `max(max_depth, 15)`, see `traversal`.
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: usize,

    /// Accepted for API compatibility with downstream consumers. External
    /// pages are never fetched regardless; only link metadata distinguishes
    /// internal from external.
    #[serde(rename = "include-external", default)]
    pub include_external: bool,
}

/// HTTP fetch settings
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSection {
    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Wall-clock ceiling for the whole crawl, in seconds
    #[serde(rename = "deadline-secs", default = "default_deadline")]
    pub deadline_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_max_pages() -> usize {
    100
}

fn default_max_depth() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_deadline() -> u64 {
    300
}

fn default_user_agent() -> String {
    format!("sitegraph/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            include_external: false,
        }
    }
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            deadline_secs: default_deadline(),
            user_agent: default_user_agent(),
        }
    }
}

/// Loads and validates a configuration file from the given path
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: CrawlConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates configuration values
///
/// Zero budgets and zero timeouts would make every crawl terminate before the
/// seed is fetched, so they are rejected up front.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.crawl.max_pages == 0 {
        return Err(ConfigError::Validation(
            "crawl.max-pages must be at least 1".to_string(),
        ));
    }
    if config.fetch.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch.request-timeout-secs must be at least 1".to_string(),
        ));
    }
    if config.fetch.deadline_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch.deadline-secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.crawl.max_pages, 100);
        assert_eq!(config.crawl.max_depth, 10);
        assert!(!config.crawl.include_external);
        assert_eq!(config.fetch.request_timeout_secs, 30);
        assert_eq!(config.fetch.deadline_secs, 300);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[crawl]
max-pages = 25
max-depth = 3
include-external = true

[fetch]
request-timeout-secs = 10
deadline-secs = 60
user-agent = "TestBot/1.0"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawl.max_pages, 25);
        assert_eq!(config.crawl.max_depth, 3);
        assert!(config.crawl.include_external);
        assert_eq!(config.fetch.request_timeout_secs, 10);
        assert_eq!(config.fetch.user_agent, "TestBot/1.0");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[crawl]\nmax-pages = 5\n").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawl.max_pages, 5);
        assert_eq!(config.crawl.max_depth, 10);
        assert_eq!(config.fetch.request_timeout_secs, 30);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[crawl]\nmax-pages = 0\n").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not valid toml [[[").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
