//! Sumi-Crawl main entry point
//!
//! This is the command-line interface for the Sumi-Crawl link crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_crawl::config::{load_config, Config};
use sumi_crawl::crawler::crawl;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

/// Sumi-Crawl: a depth-bounded link crawler
///
/// Fetches the seed URL, prints the links found on it and follows them
/// depth-first until the maximum depth is reached.
#[derive(Parser, Debug)]
#[command(name = "sumi-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded recursive link crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum crawl depth (overrides the configuration file)
    #[arg(short = 'd', long, value_name = "N")]
    max_depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let span = tracing::info_span!("crawler");
    let _guard = span.enter();

    tracing::debug!("{:?}", std::env::args().collect::<Vec<_>>());

    let Some(seed) = cli.url else {
        tracing::error!("Missing Url args");
        std::process::exit(1);
    };

    let config = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    }
    .with_max_depth(cli.max_depth);

    tracing::debug!("Max depth: {}", config.crawler.max_depth);

    drop(_guard);
    let stats = crawl(&config, &seed, std::io::stdout().lock())
        .instrument(span)
        .await?;

    tracing::info!(
        "Crawl finished: {} pages fetched, {} failed, {} links found",
        stats.pages_fetched,
        stats.fetch_failures,
        stats.links_found
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when it is set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("info"),
                1 => EnvFilter::new("sumi_crawl=debug,info"),
                _ => EnvFilter::new("sumi_crawl=trace,debug"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
