//! Validity rules applied to every extracted link

use super::Link;

/// Depth limit used when nothing else is configured
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Decides which extracted links are surfaced to the crawler
///
/// A link is valid when all of the following hold:
/// - its depth is strictly below `max_depth`
/// - its text is non-empty
/// - its URL is non-empty and does not contain `javascript` in any casing
///
/// The last rule is a plain substring test, so `/docs/javascript/intro` is
/// rejected along with `javascript:void(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    max_depth: u32,
}

impl LinkPolicy {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns true if the link should be kept
    pub fn is_valid(&self, link: &Link) -> bool {
        if link.depth() >= self.max_depth {
            return false;
        }

        if link.text().is_empty() {
            return false;
        }

        let url = link.url();
        !url.is_empty() && !url.to_lowercase().contains("javascript")
    }

    /// Whether a page at `depth` may recurse into its links
    ///
    /// This is checked against the next depth, one level stricter than
    /// [`LinkPolicy::is_valid`], so links found one level above the limit are
    /// printed but never fetched.
    pub fn allows_descent(&self, depth: u32) -> bool {
        depth.saturating_add(1) < self.max_depth
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
