//! URL normalization and crawl scoping

mod normalize;
mod scope;

pub use normalize::{normalize_url, parse_and_normalize};
pub use scope::CrawlScope;
