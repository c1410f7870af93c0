//! JSON export of a crawl result
//!
//! Downstream report generators (keyword analysis, duplicate detection, page
//! power scoring) consume this file; the field layout matches what they
//! already read.

use crate::records::CrawlResult;
use crate::Result;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes the crawl result as pretty-printed JSON
pub fn write_json(result: &CrawlResult, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CrawlStats, LinkAnalysis};
    use chrono::Utc;
    use std::collections::HashMap;

    #[test]
    fn test_write_and_reread() {
        let result = CrawlResult {
            seed: "https://example.com/".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            pages: vec![],
            links: vec!["https://example.com/a".to_string()],
            images: vec![],
            stats: CrawlStats::default(),
            link_analysis: LinkAnalysis::default(),
            backlinks_map: HashMap::new(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        write_json(&result, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["seed"], "https://example.com/");
        assert_eq!(parsed["links"][0], "https://example.com/a");
        assert_eq!(parsed["stats"]["total_pages"], 0);
    }
}
