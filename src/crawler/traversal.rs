//! Traversal controller
//!
//! Drives the depth-bounded, budget-bounded expansion over the frontier,
//! composing the fetcher, extractor and link graph per page. The frontier is
//! an explicit LIFO work stack: each page's internal links are pushed in
//! reverse document order, so the first link on a page is expanded before its
//! siblings. The resulting depth-first pre-order is committed behavior, not an
//! accident; it determines which pages get crawled under a tight budget.

use crate::config::CrawlConfig;
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{Fetch, HttpFetcher};
use crate::crawler::graph::LinkGraph;
use crate::output::compute_stats;
use crate::records::{CrawlResult, LinkAnalysis, PageRecord};
use crate::url::{parse_and_normalize, CrawlScope};
use crate::{CrawlError, Result};
use chrono::Utc;
use std::time::{Duration, Instant};
use url::Url;

/// The configured max depth is raised to this floor at crawl start, so the
/// runtime limit is `max(configured, 15)`. Inherited quirk kept for
/// compatibility with existing scan results; removing it needs product
/// sign-off.
const DEPTH_FLOOR: usize = 15;

/// At most this many internal links per page are scheduled for further
/// traversal, selected in document order
const MAX_LINKS_PER_PAGE: usize = 20;

/// Crawls a site starting from `seed` using the plain-HTTP fetcher
///
/// Fails only on an invalid seed URL or if zero pages could be recorded;
/// every per-URL failure is logged and skipped.
pub async fn crawl(seed: &str, config: &CrawlConfig) -> Result<CrawlResult> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    crawl_with_fetcher(seed, config, &fetcher).await
}

/// Crawls a site with a caller-provided fetcher implementation
pub async fn crawl_with_fetcher<F: Fetch>(
    seed: &str,
    config: &CrawlConfig,
    fetcher: &F,
) -> Result<CrawlResult> {
    let seed_url = parse_and_normalize(seed).map_err(|e| CrawlError::InvalidSeedUrl {
        url: seed.to_string(),
        reason: e.to_string(),
    })?;

    let scope = CrawlScope::from_seed(&seed_url);
    let mut graph = LinkGraph::new(scope.clone());
    let mut pages: Vec<PageRecord> = Vec::new();

    let effective_max_depth = config.crawl.max_depth.max(DEPTH_FLOOR);
    let deadline = Instant::now() + Duration::from_secs(config.fetch.deadline_secs);
    let started_at = Utc::now();

    tracing::info!(
        "Starting crawl of {} (budget {} pages, depth {})",
        seed_url,
        config.crawl.max_pages,
        effective_max_depth
    );

    let mut stack: Vec<(Url, usize)> = vec![(seed_url.clone(), 0)];

    while let Some((url, depth)) = stack.pop() {
        if graph.visited_count() >= config.crawl.max_pages {
            tracing::info!("Page budget reached, stopping");
            break;
        }
        if Instant::now() >= deadline {
            tracing::warn!("Crawl deadline reached, stopping with {} pages", pages.len());
            break;
        }
        if depth > effective_max_depth {
            continue;
        }
        // check-then-insert: a URL enters the visited set exactly once, at
        // the moment it is chosen for traversal
        if !graph.mark_visited(url.as_str()) {
            continue;
        }

        let fetched = match fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                // Soft failure: no page record, URL excluded from expansion
                tracing::warn!("Fetch failed for {}: {}", url, e);
                continue;
            }
        };

        tracing::debug!(
            "Fetched {} (status {}, depth {}, {:.2}s)",
            url,
            fetched.status_code,
            depth,
            fetched.load_time
        );

        let extracted = extract_page(&url, &fetched.body, &scope);
        let frontier = graph.absorb_page(url.as_str(), &extracted);

        let (internal_detailed, external_detailed): (Vec<_>, Vec<_>) =
            extracted.links.iter().cloned().partition(|l| l.internal);

        pages.push(PageRecord {
            url: url.to_string(),
            status_code: fetched.status_code,
            title: extracted.title,
            meta_description: extracted.meta_description,
            canonical: extracted.canonical,
            h1: extracted.h1,
            h2: extracted.h2,
            content: extracted.content,
            word_count: extracted.word_count,
            content_hash: extracted.content_hash,
            crawl_depth: depth,
            load_time: fetched.load_time,
            internal_links: frontier.iter().map(|u| u.to_string()).collect(),
            external_links: extracted.external_links,
            internal_links_detailed: internal_detailed,
            external_links_detailed: external_detailed,
            images: extracted.images,
            broken_links_on_page: extracted.broken_links,
            backlinks_count: graph.backlink_count(url.as_str()),
        });

        // Reverse push keeps document order on a LIFO stack
        for next in frontier.into_iter().take(MAX_LINKS_PER_PAGE).rev() {
            stack.push((next, depth + 1));
        }
    }

    if pages.is_empty() {
        return Err(CrawlError::EmptyCrawl {
            seed: seed.to_string(),
        });
    }

    let (backlinks_map, broken_links, links, images) = graph.into_parts();
    let link_analysis = analyze_links(&pages, broken_links);
    let stats = compute_stats(&pages, links.len(), images.len());

    tracing::info!(
        "Crawl finished: {} pages, {} unique links, {} broken",
        pages.len(),
        links.len(),
        link_analysis.broken_links.len()
    );

    Ok(CrawlResult {
        seed: seed_url.to_string(),
        started_at,
        finished_at: Utc::now(),
        pages,
        links,
        images,
        stats,
        link_analysis,
        backlinks_map,
    })
}

/// Flattens per-page link lists into crawl-wide totals and detail lists
///
/// `broken_links` comes from the link graph's global registry, the
/// authoritative accumulation across the whole crawl.
fn analyze_links(pages: &[PageRecord], broken_links: Vec<crate::records::BrokenLink>) -> LinkAnalysis {
    let mut analysis = LinkAnalysis {
        broken_links,
        ..LinkAnalysis::default()
    };

    for page in pages {
        for link in page
            .internal_links_detailed
            .iter()
            .chain(&page.external_links_detailed)
        {
            if link.is_untitled {
                analysis.untitled_links.push(link.clone());
            }
        }
        analysis
            .internal_links_detailed
            .extend(page.internal_links_detailed.iter().cloned());
        analysis
            .external_links_detailed
            .extend(page.external_links_detailed.iter().cloned());
    }

    analysis.total_internal_links = analysis.internal_links_detailed.len();
    analysis.total_external_links = analysis.external_links_detailed.len();
    analysis
}
