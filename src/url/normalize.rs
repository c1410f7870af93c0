//! URL normalization
//!
//! A normalized URL is the canonical string form used as both the visited-set
//! key and the backlink-map key. Two URLs differing only by fragment or a
//! trailing slash normalize identically; two URLs differing by query string do
//! not.

use crate::UrlError;
use url::Url;

/// Normalizes an already-parsed URL
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything after #)
/// 2. Remove a single trailing slash from the path (the root path `/` is
///    preserved; `https://example.com` and `https://example.com/` parse to
///    the same URL anyway)
/// 3. Preserve scheme, path and query verbatim
///
/// Path and query case is not folded; `?a=1` and `?A=1` stay distinct. This
/// is a documented limitation, not a defect. The host is lowercased by the
/// `url` crate at parse time.
///
/// Opaque URLs (mailto:, javascript:, etc.) only lose their fragment.
///
/// Pure function, callable concurrently.
///
/// # Examples
///
/// ```
/// use sitegraph::url::normalize_url;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/page/#section").unwrap();
/// assert_eq!(normalize_url(&url).as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);

    if !normalized.cannot_be_a_base() {
        let path = normalized.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path[..path.len() - 1].to_string();
            normalized.set_path(&trimmed);
        }
    }

    normalized
}

/// Parses a URL string and normalizes it
///
/// Only http and https URLs with a host are accepted; this is the entry point
/// used for seed validation.
pub fn parse_and_normalize(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(normalize_url(&url))
}
