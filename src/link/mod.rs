//! Discovered hyperlinks and the policy deciding which ones are kept
//!
//! A [`Link`] is built once an anchor's start and end tags have both been
//! seen. Its rendering is the line format used for the crawl tree on stdout.

mod policy;

pub use policy::{LinkPolicy, DEFAULT_MAX_DEPTH};

use crate::crawler::Attribute;
use std::fmt;

/// One hyperlink found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    url: String,
    text: String,
    depth: u32,
}

impl Link {
    /// Creates a link, trimming surrounding whitespace from `url` and `text`
    pub fn new(url: impl AsRef<str>, text: impl AsRef<str>, depth: u32) -> Self {
        Self {
            url: url.as_ref().trim().to_string(),
            text: text.as_ref().trim().to_string(),
            depth,
        }
    }

    /// Builds a link from the attributes of an anchor start tag
    ///
    /// The value of the `href` attribute becomes the URL. Without one the URL
    /// stays empty and the policy will reject the link. The tokenizer drops
    /// repeated attributes, so the first `href` in the markup is the one seen.
    pub fn from_anchor(attributes: &[Attribute], text: &str, depth: u32) -> Self {
        let href = attributes
            .iter()
            .find(|attr| attr.name == "href")
            .map(|attr| attr.value.as_str())
            .unwrap_or("");

        Self::new(href, text, depth)
    }

    /// The trimmed href value
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The trimmed text content between the anchor tags
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Depth of the page that contained this link
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str("\t")?;
        }
        writeln!(f, "{} ({}) - {}", self.text, self.depth, self.url)
    }
}
