//! Configuration module for Sumi-Crawl
//!
//! Configuration is optional. Without a file every value takes its default,
//! most importantly a maximum depth of 2.
//!
//! # Example
//!
//! ```no_run
//! use sumi_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
