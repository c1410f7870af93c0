//! The crawl engine: fetcher, extractor, link graph, traversal

mod extractor;
mod fetcher;
mod graph;
mod traversal;

pub use extractor::{extract_page, ExtractedPage};
pub use fetcher::{build_http_client, Fetch, FetchError, FetchedPage, HttpFetcher};
pub use graph::LinkGraph;
pub use traversal::{crawl, crawl_with_fetcher};
