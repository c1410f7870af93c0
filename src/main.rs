//! Sitegraph command-line entry point

use anyhow::Context;
use clap::Parser;
use sitegraph::config::{load_config, validate, CrawlConfig};
use sitegraph::crawler::crawl;
use sitegraph::output::{print_stats, write_json};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitegraph: crawl a website and build its link graph
///
/// Crawls from the seed URL within the seed's domain, bounded by a page
/// budget and depth limit, and reports per-page metadata, backlinks and
/// broken links.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "Crawl a website and build its link graph", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Maximum crawl depth from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Record external link metadata flag for downstream consumers
    /// (external pages are never fetched either way)
    #[arg(long)]
    include_external: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the full crawl result as JSON to this path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => CrawlConfig::default(),
    };

    // CLI flags override file values
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawl.max_depth = max_depth;
    }
    if cli.include_external {
        config.crawl.include_external = true;
    }
    validate(&config).context("invalid configuration")?;

    let result = crawl(&cli.seed, &config)
        .await
        .with_context(|| format!("crawling {}", cli.seed))?;

    if !cli.quiet {
        print_stats(
            &result.stats,
            result.link_analysis.broken_links.len(),
            result.link_analysis.untitled_links.len(),
        );
    }

    if let Some(path) = &cli.output {
        write_json(&result, path).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Result written to {}", path.display());
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
