//! Crawler module for page fetching and link traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with success/failure classification
//! - Streaming markup tokenization
//! - Anchor link extraction
//! - Depth-first traversal

mod extractor;
mod fetcher;
mod tokenizer;
mod traversal;

pub use extractor::{extract_from_tokens, extract_links, extract_links_from_str, LinkExtractor};
pub use fetcher::{build_http_client, Fetcher, PageBody};
pub use tokenizer::{tokenize, Attribute, MarkupToken, MarkupTokenizer};
pub use traversal::{CrawlStats, Crawler};

use crate::config::Config;
use crate::link::LinkPolicy;
use crate::CrawlError;
use std::io::Write;

/// Runs a complete crawl from `seed`, printing the link tree to `out`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Fetch the seed page at depth 0
/// 3. Extract, print and follow links until the depth limit is reached
///
/// Fetch failures never make this fail; they only end their own branch.
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed
/// * `Err(CrawlError)` - The HTTP client could not be built
pub async fn crawl<W: Write>(
    config: &Config,
    seed: &str,
    out: W,
) -> Result<CrawlStats, CrawlError> {
    let fetcher = Fetcher::from_config(&config.crawler)?;
    let policy = LinkPolicy::new(config.crawler.max_depth);
    let mut crawler = Crawler::new(fetcher, policy, out);
    Ok(crawler.run(seed).await)
}
