use crate::link::DEFAULT_MAX_DEPTH;
use serde::Deserialize;

/// Main configuration structure for Sumi-Crawl
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pages at this depth or deeper contribute no links
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Per-request timeout in seconds; requests never time out when unset
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Overrides the maximum depth, e.g. from a command-line flag
    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        if let Some(depth) = max_depth {
            self.crawler.max_depth = depth;
        }
        self
    }
}
