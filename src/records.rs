//! Crawl data model
//!
//! These types form the immutable snapshot handed to downstream consumers
//! (keyword analysis, duplicate detection, page power scoring, audits). Field
//! names match the JSON shape those consumers already read, so a serialized
//! [`CrawlResult`] is directly consumable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One anchor encountered on some page
///
/// Created during extraction of its source page and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Resolved absolute URL
    pub url: String,

    /// The raw href attribute as written in the markup
    pub href: String,

    /// Visible anchor text, trimmed
    pub anchor_text: String,

    /// The title attribute, empty if absent
    pub title: String,

    /// True iff the visible text is empty after trimming
    pub is_untitled: bool,

    /// True iff the link host matches the crawl's base domain (or the href
    /// has no host component)
    pub internal: bool,

    /// URL of the page the anchor was found on
    pub source_page: String,

    /// Approximate location hint, e.g. "In <p> tag"
    pub location: String,
}

/// An anchor classified as non-navigable, with the reason why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokenLink {
    #[serde(flatten)]
    pub link: LinkRecord,

    /// Short issue code, e.g. "Empty href" or "Broken anchor link"
    pub issue: String,

    /// Human-readable explanation
    pub reason: String,
}

/// One recorded instance of a page linking to a target URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklinkSource {
    pub from_url: String,
    pub anchor_text: String,
    pub title: String,
}

/// An image reference found on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Resolved absolute image URL
    pub url: String,

    /// Alt text, empty string if absent
    pub alt: String,

    /// URL of the page the image was found on
    pub page_url: String,
}

/// One successfully processed URL
///
/// Created once during extraction and immutable afterward. `backlinks_count`
/// is a snapshot taken at the moment this page was visited; backlinks
/// discovered later in the crawl are reflected only in
/// [`CrawlResult::backlinks_map`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Canonical (normalized) URL this page was fetched as
    pub url: String,

    /// Final HTTP status code after redirects
    pub status_code: u16,

    /// Text of the first <title> element, empty if absent
    pub title: String,

    pub meta_description: String,

    /// Canonical link from head metadata, resolved absolute, empty if absent
    pub canonical: String,

    pub h1: Vec<String>,

    /// H2 headings, capped at 20
    pub h2: Vec<String>,

    /// Extracted body text, capped at 10,000 characters
    pub content: String,

    /// Word count of the *uncapped* extracted text
    pub word_count: usize,

    /// Hex SHA-256 digest of the uncapped extracted text; equality key for
    /// duplicate detection, not security-sensitive
    pub content_hash: String,

    /// Depth at which this page was reached from the seed
    pub crawl_depth: usize,

    /// Fetch latency in seconds
    pub load_time: f64,

    /// Normalized internal link targets that were unvisited when this page
    /// was extracted, deduplicated, in document order
    pub internal_links: Vec<String>,

    /// External link URLs, capped at 50
    pub external_links: Vec<String>,

    pub internal_links_detailed: Vec<LinkRecord>,

    pub external_links_detailed: Vec<LinkRecord>,

    pub images: Vec<ImageRef>,

    /// Broken links found while parsing this page
    pub broken_links_on_page: Vec<BrokenLink>,

    /// Backlink count for this page at the time it was visited
    pub backlinks_count: usize,
}

/// Link totals and detailed lists across the whole crawl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkAnalysis {
    pub total_internal_links: usize,
    pub total_external_links: usize,
    pub untitled_links: Vec<LinkRecord>,
    pub broken_links: Vec<BrokenLink>,
    pub internal_links_detailed: Vec<LinkRecord>,
    pub external_links_detailed: Vec<LinkRecord>,
}

/// Summary counters derived from the finished page set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub total_pages: usize,
    pub total_words: usize,
    pub avg_word_count: f64,
    /// Average load time in seconds, rounded to 2 decimals
    pub avg_load_time: f64,
    pub pages_with_title: usize,
    pub pages_with_meta: usize,
    pub total_images: usize,
    pub total_links: usize,
    /// HTTP status code -> number of pages
    pub status_codes: HashMap<u16, usize>,
}

/// The complete output of one crawl invocation
///
/// Treat as an immutable snapshot for the scan's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    /// The normalized seed URL the crawl started from
    pub seed: String,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Page records in visit order (depth-first pre-order)
    pub pages: Vec<PageRecord>,

    /// Flattened unique set of every absolute link URL seen, sorted
    pub links: Vec<String>,

    /// Every image reference seen, in discovery order
    pub images: Vec<ImageRef>,

    pub stats: CrawlStats,

    pub link_analysis: LinkAnalysis,

    /// Normalized target URL -> backlink sources. Only targets with at least
    /// one backlink appear; keys may reference URLs that were never crawled.
    pub backlinks_map: HashMap<String, Vec<BacklinkSource>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_link_serializes_flattened() {
        let broken = BrokenLink {
            link: LinkRecord {
                url: "https://example.com/".to_string(),
                href: String::new(),
                anchor_text: "x".to_string(),
                title: String::new(),
                is_untitled: false,
                internal: true,
                source_page: "https://example.com/".to_string(),
                location: "In <p> tag".to_string(),
            },
            issue: "Empty href".to_string(),
            reason: "Link has no href attribute".to_string(),
        };

        let value = serde_json::to_value(&broken).unwrap();
        // Link fields sit at the top level alongside issue/reason
        assert_eq!(value["href"], "");
        assert_eq!(value["issue"], "Empty href");
        assert_eq!(value["anchor_text"], "x");
    }

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = CrawlStats::default();
        assert_eq!(stats.total_pages, 0);
        assert_eq!(stats.avg_word_count, 0.0);
        assert!(stats.status_codes.is_empty());
    }
}
