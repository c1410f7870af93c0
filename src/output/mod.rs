//! Crawl result summarization and export

mod json;
mod stats;

pub use json::write_json;
pub use stats::{compute_stats, print_stats};
