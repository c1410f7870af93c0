//! Link graph state
//!
//! One [`LinkGraph`] instance is owned by a single crawl invocation and holds
//! the visited set, the backlink map, the broken-link registry and the global
//! link/image pools. The visited set is the single source of truth preventing
//! re-fetch: a URL enters it exactly once, at the moment it is chosen for
//! traversal, not when it is first discovered as a link.

use crate::crawler::extractor::ExtractedPage;
use crate::records::{BacklinkSource, BrokenLink, ImageRef};
use crate::url::{normalize_url, CrawlScope};
use std::collections::{BTreeSet, HashMap, HashSet};
use url::Url;

#[derive(Debug)]
pub struct LinkGraph {
    scope: CrawlScope,

    /// Normalized URLs already dequeued for fetching
    visited: HashSet<String>,

    /// Normalized target URL -> backlink sources, accumulated across the
    /// whole crawl. Keys may reference URLs that are never crawled.
    backlinks: HashMap<String, Vec<BacklinkSource>>,

    /// Append-only registry of every broken link found
    broken_links: Vec<BrokenLink>,

    /// Every absolute link URL seen, deduplicated. BTreeSet keeps the
    /// flattened output deterministic.
    all_links: BTreeSet<String>,

    /// Every image reference seen, in discovery order
    all_images: Vec<ImageRef>,
}

impl LinkGraph {
    pub fn new(scope: CrawlScope) -> Self {
        Self {
            scope,
            visited: HashSet::new(),
            backlinks: HashMap::new(),
            broken_links: Vec::new(),
            all_links: BTreeSet::new(),
            all_images: Vec::new(),
        }
    }

    /// Marks a normalized URL as visited; returns false if it already was
    pub fn mark_visited(&mut self, normalized: &str) -> bool {
        self.visited.insert(normalized.to_string())
    }

    pub fn is_visited(&self, normalized: &str) -> bool {
        self.visited.contains(normalized)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Consumes the links extracted from one page and updates global state
    ///
    /// Appends one backlink entry per in-scope internal anchor *occurrence*
    /// (duplicate anchors on a page each count, and targets need not be
    /// visited), registers the page's broken links and images, and returns
    /// the frontier candidates: the page's deduplicated internal targets that
    /// have not yet entered the visited set, in document order.
    pub fn absorb_page(&mut self, page_url: &str, extracted: &ExtractedPage) -> Vec<Url> {
        for link in &extracted.links {
            self.all_links.insert(link.url.clone());

            if !link.internal {
                continue;
            }
            let Ok(resolved) = Url::parse(&link.url) else {
                continue;
            };
            let normalized = normalize_url(&resolved);
            if !self.scope.in_scope(&normalized) {
                continue;
            }

            self.backlinks
                .entry(normalized.to_string())
                .or_default()
                .push(BacklinkSource {
                    from_url: page_url.to_string(),
                    anchor_text: link.anchor_text.clone(),
                    title: link.title.clone(),
                });
        }

        self.broken_links.extend(extracted.broken_links.iter().cloned());
        self.all_images.extend(extracted.images.iter().cloned());

        extracted
            .internal_candidates
            .iter()
            .filter(|candidate| !self.is_visited(candidate.as_str()))
            .cloned()
            .collect()
    }

    /// Current backlink count for a normalized URL
    pub fn backlink_count(&self, normalized: &str) -> usize {
        self.backlinks.get(normalized).map_or(0, Vec::len)
    }

    pub fn broken_link_count(&self) -> usize {
        self.broken_links.len()
    }

    pub fn unique_link_count(&self) -> usize {
        self.all_links.len()
    }

    pub fn image_count(&self) -> usize {
        self.all_images.len()
    }

    /// Tears the graph down into the pieces the crawl result is built from:
    /// (backlink map, broken links, sorted unique links, images)
    pub fn into_parts(
        self,
    ) -> (
        HashMap<String, Vec<BacklinkSource>>,
        Vec<BrokenLink>,
        Vec<String>,
        Vec<ImageRef>,
    ) {
        let links = self.all_links.into_iter().collect();
        (self.backlinks, self.broken_links, links, self.all_images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::extractor::extract_page;

    fn scope() -> CrawlScope {
        CrawlScope::from_seed(&Url::parse("https://example.com/").unwrap())
    }

    fn graph() -> LinkGraph {
        LinkGraph::new(scope())
    }

    fn absorb(graph: &mut LinkGraph, page: &str, html: &str) -> Vec<Url> {
        let url = Url::parse(page).unwrap();
        let extracted = extract_page(&url, html, &scope());
        graph.absorb_page(url.as_str(), &extracted)
    }

    #[test]
    fn test_visited_insert_once() {
        let mut g = graph();
        assert!(g.mark_visited("https://example.com/a"));
        assert!(!g.mark_visited("https://example.com/a"));
        assert_eq!(g.visited_count(), 1);
    }

    #[test]
    fn test_backlinks_accumulate_for_unvisited_targets() {
        let mut g = graph();
        absorb(
            &mut g,
            "https://example.com/",
            r#"<body><a href="/never-crawled" title="t">Anchor</a></body>"#,
        );

        assert_eq!(g.backlink_count("https://example.com/never-crawled"), 1);
        let (backlinks, _, _, _) = g.into_parts();
        let sources = &backlinks["https://example.com/never-crawled"];
        assert_eq!(sources[0].from_url, "https://example.com/");
        assert_eq!(sources[0].anchor_text, "Anchor");
        assert_eq!(sources[0].title, "t");
    }

    #[test]
    fn test_duplicate_anchors_each_count_as_backlinks() {
        let mut g = graph();
        let frontier = absorb(
            &mut g,
            "https://example.com/",
            r#"<body><a href="/a">one</a><a href="/b">two</a><a href="/a">again</a></body>"#,
        );

        // Both occurrences of /a count toward backlinks
        assert_eq!(g.backlink_count("https://example.com/a"), 2);
        assert_eq!(g.backlink_count("https://example.com/b"), 1);
        // But /a is scheduled only once
        let urls: Vec<&str> = frontier.iter().map(|u| u.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_backlinks_accumulate_across_pages() {
        let mut g = graph();
        absorb(&mut g, "https://example.com/", r#"<a href="/t">x</a>"#);
        absorb(&mut g, "https://example.com/other", r#"<a href="/t">y</a>"#);
        assert_eq!(g.backlink_count("https://example.com/t"), 2);
    }

    #[test]
    fn test_frontier_excludes_visited() {
        let mut g = graph();
        g.mark_visited("https://example.com/a");
        let frontier = absorb(
            &mut g,
            "https://example.com/",
            r#"<body><a href="/a">a</a><a href="/b">b</a></body>"#,
        );
        let urls: Vec<&str> = frontier.iter().map(|u| u.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/b"]);
        // Visited targets still gain backlinks
        assert_eq!(g.backlink_count("https://example.com/a"), 1);
    }

    #[test]
    fn test_external_links_get_no_backlinks() {
        let mut g = graph();
        let frontier = absorb(
            &mut g,
            "https://example.com/",
            r#"<a href="https://other.com/x">x</a>"#,
        );
        assert!(frontier.is_empty());
        assert_eq!(g.backlink_count("https://other.com/x"), 0);
        assert_eq!(g.unique_link_count(), 1);
    }

    #[test]
    fn test_fragment_variants_share_a_backlink_key() {
        let mut g = graph();
        absorb(
            &mut g,
            "https://example.com/",
            r##"<a href="/a#top">x</a><a href="/a/">y</a>"##,
        );
        assert_eq!(g.backlink_count("https://example.com/a"), 2);
    }

    #[test]
    fn test_broken_links_collected_globally() {
        let mut g = graph();
        absorb(&mut g, "https://example.com/", r#"<a href="">x</a>"#);
        absorb(&mut g, "https://example.com/b", r##"<a href="#gone">y</a>"##);
        assert_eq!(g.broken_link_count(), 2);
    }

    #[test]
    fn test_unique_links_deduplicated_and_sorted() {
        let mut g = graph();
        absorb(&mut g, "https://example.com/", r#"<a href="/z">z</a><a href="/a">a</a>"#);
        absorb(&mut g, "https://example.com/p", r#"<a href="/z">z</a>"#);
        let (_, _, links, _) = g.into_parts();
        assert_eq!(links, vec!["https://example.com/a", "https://example.com/z"]);
    }
}
