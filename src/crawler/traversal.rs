//! Depth-first traversal driver
//!
//! Fetches a page, extracts its links and walks into each of them in document
//! order. Recursion depth equals crawl depth, so nothing but the depth limit
//! keeps the walk finite: there is no visited set and a page reachable along
//! two paths is fetched twice.

use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::Fetcher;
use crate::link::{Link, LinkPolicy};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;

/// Counters collected over one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched with a success status
    pub pages_fetched: u64,

    /// Fetches that ended in a transport or status error
    pub fetch_failures: u64,

    /// Valid links extracted across all pages
    pub links_found: u64,
}

/// Recursive crawler writing the link tree to `out`
pub struct Crawler<W> {
    fetcher: Fetcher,
    policy: LinkPolicy,
    out: W,
    stats: CrawlStats,
}

impl<W: Write> Crawler<W> {
    pub fn new(fetcher: Fetcher, policy: LinkPolicy, out: W) -> Self {
        Self {
            fetcher,
            policy,
            out,
            stats: CrawlStats::default(),
        }
    }

    /// Consumes the crawler, handing back the output writer
    pub fn into_output(self) -> W {
        self.out
    }

    /// Crawls from a seed URL at depth 0
    pub async fn run(&mut self, seed: &str) -> CrawlStats {
        self.crawl(seed, 0).await;
        self.stats
    }

    /// Visits `url` as a page at `depth`
    ///
    /// A failed fetch is logged and ends this branch only. For every link on
    /// the page the whole sibling list is printed again, then the link is
    /// followed if the next depth is still below the limit.
    pub fn crawl<'a>(
        &'a mut self,
        url: &'a str,
        depth: u32,
    ) -> Pin<Box<dyn Future<Output = ()> + 'a>> {
        Box::pin(async move {
            let body = match self.fetcher.fetch(url).await {
                Ok(body) => body,
                Err(error) => {
                    tracing::error!("{}", error);
                    self.stats.fetch_failures += 1;
                    return;
                }
            };
            self.stats.pages_fetched += 1;

            let links = extract_links(body, depth, self.policy).await;
            self.stats.links_found += links.len() as u64;

            for link in &links {
                self.print_links(&links);

                if self.policy.allows_descent(depth) {
                    self.crawl(link.url(), depth + 1).await;
                }
            }
        })
    }

    /// Writes the list as `[first second ...]`, one space between links
    fn print_links(&mut self, links: &[Link]) {
        let rendered: Vec<String> = links.iter().map(Link::to_string).collect();
        let result = writeln!(self.out, "[{}]", rendered.join(" "))
            .and_then(|_| self.out.flush());

        if let Err(error) = result {
            tracing::warn!("Failed to write links: {}", error);
        }
    }
}
