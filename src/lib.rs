//! Sumi-Crawl: a depth-bounded recursive link crawler
//!
//! This crate fetches a seed page, extracts its anchor links with a streaming
//! tokenizer, filters them through a validity policy and recursively visits
//! every surviving link until the configured depth limit is reached, printing
//! a tab-indented tree of discovered links along the way.

pub mod config;
pub mod crawler;
pub mod link;

use thiserror::Error;

/// Main error type for Sumi-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Errors produced while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a status code above 299
    #[error("Error ({status}): {url}\n")]
    Status { status: u16, url: String },

    /// The HTTP exchange could not be completed (DNS, connect, timeout, bad URL)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body stream broke after a successful status line
    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL the failed request was addressed to
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }

    /// The HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { source, .. } | FetchError::Body { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Sumi-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Fetcher};
pub use link::{Link, LinkPolicy};
