//! Crawl scope: the base domain captured from the seed URL
//!
//! Internal/external classification compares hosts only; whether a URL may
//! enter the traversal frontier additionally requires a scheme match.

use url::Url;

/// The scheme+host(+port) boundary of one crawl, captured from the seed
#[derive(Debug, Clone)]
pub struct CrawlScope {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl CrawlScope {
    /// Captures the scope from a (validated) seed URL
    pub fn from_seed(seed: &Url) -> Self {
        Self {
            scheme: seed.scheme().to_string(),
            host: seed.host_str().unwrap_or_default().to_string(),
            port: seed.port(),
        }
    }

    /// Whether a resolved link counts as internal
    ///
    /// A link is internal if its host and port equal the base domain's, or if
    /// it has no host component at all (mailto:, javascript: and friends
    /// resolve without one).
    pub fn is_internal(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => host == self.host && url.port() == self.port,
            None => true,
        }
    }

    /// Whether a URL lies within the crawlable base domain (scheme+host match)
    ///
    /// Only in-scope URLs become frontier candidates or backlink keys.
    pub fn in_scope(&self, url: &Url) -> bool {
        url.scheme() == self.scheme && self.is_internal(url) && url.host_str().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(seed: &str) -> CrawlScope {
        CrawlScope::from_seed(&Url::parse(seed).unwrap())
    }

    #[test]
    fn test_same_host_is_internal() {
        let s = scope("https://example.com/");
        assert!(s.is_internal(&Url::parse("https://example.com/page").unwrap()));
    }

    #[test]
    fn test_other_host_is_external() {
        let s = scope("https://example.com/");
        assert!(!s.is_internal(&Url::parse("https://other.com/page").unwrap()));
    }

    #[test]
    fn test_subdomain_is_external() {
        let s = scope("https://example.com/");
        assert!(!s.is_internal(&Url::parse("https://blog.example.com/").unwrap()));
    }

    #[test]
    fn test_hostless_url_is_internal() {
        let s = scope("https://example.com/");
        assert!(s.is_internal(&Url::parse("mailto:someone@example.com").unwrap()));
    }

    #[test]
    fn test_hostless_url_not_in_scope() {
        let s = scope("https://example.com/");
        assert!(!s.in_scope(&Url::parse("mailto:someone@example.com").unwrap()));
    }

    #[test]
    fn test_scheme_mismatch_not_in_scope() {
        let s = scope("https://example.com/");
        let http = Url::parse("http://example.com/page").unwrap();
        assert!(s.is_internal(&http));
        assert!(!s.in_scope(&http));
    }

    #[test]
    fn test_port_distinguishes_hosts() {
        let s = scope("http://127.0.0.1:8080/");
        assert!(s.in_scope(&Url::parse("http://127.0.0.1:8080/page").unwrap()));
        assert!(!s.is_internal(&Url::parse("http://127.0.0.1:9090/page").unwrap()));
    }
}
