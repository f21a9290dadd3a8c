//! HTTP fetcher implementation
//!
//! Issues a single GET per URL and classifies the outcome:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | Status 100-299 | `Ok(PageBody)`, body not yet read |
//! | Status >= 300 | `Err(FetchError::Status)`, body never read |
//! | DNS, connect, timeout, malformed URL | `Err(FetchError::Transport)` |
//!
//! There are no retries and no backoff.

use crate::config::CrawlerConfig;
use crate::{FetchError, FetchResult};
use reqwest::{Client, Response};
use std::time::Duration;

/// Builds the HTTP client used for every request of a crawl
///
/// No custom headers are set and the client's default redirect policy is
/// kept. A request timeout is only applied when one is configured.
///
/// # Example
///
/// ```no_run
/// use sumi_crawl::config::CrawlerConfig;
/// use sumi_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// A successful response whose body has not been read yet
///
/// The body can be read once, front to back, through
/// [`PageBody::next_chunk`]. Dropping the value releases the connection.
#[derive(Debug)]
pub struct PageBody {
    url: String,
    status: u16,
    response: Response,
}

impl PageBody {
    /// The URL the page was requested with
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reads the next chunk of the body, `None` once it is exhausted
    pub async fn next_chunk(&mut self) -> FetchResult<Option<Vec<u8>>> {
        match self.response.chunk().await {
            Ok(chunk) => Ok(chunk.map(|bytes| bytes.to_vec())),
            Err(source) => Err(FetchError::Body {
                url: self.url.clone(),
                source,
            }),
        }
    }
}

/// Fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Sends a GET request for `url`
    ///
    /// The URL is passed to the client as is. A malformed URL surfaces as a
    /// transport error.
    pub async fn fetch(&self, url: &str) -> FetchResult<PageBody> {
        tracing::debug!("Downloading {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(source) => {
                tracing::debug!("Error: {}", source);
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    source,
                });
            }
        };

        let status = response.status().as_u16();
        if status > 299 {
            let error = FetchError::Status {
                status,
                url: url.to_string(),
            };
            tracing::debug!("{}", error);
            return Err(error);
        }

        Ok(PageBody {
            url: url.to_string(),
            status,
            response,
        })
    }
}
