//! Stats aggregation
//!
//! Pure derivation of summary counters from the finished page set. An empty
//! page set yields the zero-valued default rather than an error.

use crate::records::{CrawlStats, PageRecord};
use std::collections::HashMap;

/// Derives summary counters from the finished page records
///
/// `total_links` and `total_images` are the crawl-wide distinct link count
/// and global image count, which live on the link graph rather than on any
/// single page.
pub fn compute_stats(pages: &[PageRecord], total_links: usize, total_images: usize) -> CrawlStats {
    if pages.is_empty() {
        return CrawlStats::default();
    }

    let total_pages = pages.len();
    let total_words: usize = pages.iter().map(|p| p.word_count).sum();
    let total_load_time: f64 = pages.iter().map(|p| p.load_time).sum();

    let mut status_codes: HashMap<u16, usize> = HashMap::new();
    for page in pages {
        *status_codes.entry(page.status_code).or_insert(0) += 1;
    }

    CrawlStats {
        total_pages,
        total_words,
        avg_word_count: total_words as f64 / total_pages as f64,
        avg_load_time: round2(total_load_time / total_pages as f64),
        pages_with_title: pages.iter().filter(|p| !p.title.is_empty()).count(),
        pages_with_meta: pages
            .iter()
            .filter(|p| !p.meta_description.is_empty())
            .count(),
        total_images,
        total_links,
        status_codes,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prints a human-readable crawl summary to stdout
pub fn print_stats(stats: &CrawlStats, broken_links: usize, untitled_links: usize) {
    println!("=== Crawl Summary ===\n");

    println!("Pages crawled: {}", stats.total_pages);
    println!(
        "  with title: {}, with meta description: {}",
        stats.pages_with_title, stats.pages_with_meta
    );
    println!(
        "Words: {} total, {:.0} per page",
        stats.total_words, stats.avg_word_count
    );
    println!("Average load time: {:.2}s", stats.avg_load_time);
    println!("Unique links: {}", stats.total_links);
    println!("Images: {}", stats.total_images);
    println!("Broken links: {}", broken_links);
    println!("Untitled links: {}", untitled_links);

    println!("\nStatus codes:");
    let mut codes: Vec<_> = stats.status_codes.iter().collect();
    codes.sort_by_key(|(code, _)| **code);
    for (code, count) in codes {
        println!("  {}: {}", code, count);
    }
}
