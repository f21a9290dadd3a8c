//! Anchor link extraction
//!
//! A single forward pass over a [`MarkupToken`] stream. The extractor is an
//! explicit two-state machine:
//!
//! | State | Token | Action |
//! |-------|-------|--------|
//! | `Idle` | `<a>` with attributes | remember attributes, start collecting text |
//! | `Idle` | `<a>` without attributes | ignored |
//! | `Idle` | `</a>` | warn about the orphaned end tag, stay idle |
//! | `OpenAnchor` | text | append to the text buffer |
//! | `OpenAnchor` | `</a>` | build a [`Link`], keep it if valid, back to `Idle` |
//! | any | end / error | stop, return what was collected |

use crate::crawler::fetcher::PageBody;
use crate::crawler::tokenizer::{Attribute, MarkupToken, MarkupTokenizer};
use crate::link::{Link, LinkPolicy};
use std::ops::ControlFlow;

/// Current position of the extractor relative to anchor tags
#[derive(Debug, Clone, PartialEq, Eq)]
enum AnchorState {
    Idle,
    OpenAnchor {
        attributes: Vec<Attribute>,
        text: String,
    },
}

/// Turns anchor tags into [`Link`]s for a page at a given depth
#[derive(Debug)]
pub struct LinkExtractor {
    depth: u32,
    policy: LinkPolicy,
    state: AnchorState,
    links: Vec<Link>,
}

impl LinkExtractor {
    pub fn new(depth: u32, policy: LinkPolicy) -> Self {
        Self {
            depth,
            policy,
            state: AnchorState::Idle,
            links: Vec::new(),
        }
    }

    /// Processes one token
    ///
    /// Returns `ControlFlow::Break` on the end or error token. Callers stop
    /// feeding at that point.
    pub fn process(&mut self, token: MarkupToken) -> ControlFlow<()> {
        match token {
            MarkupToken::End => return ControlFlow::Break(()),
            MarkupToken::Error(error) => {
                tracing::debug!("Stopping link extraction: {}", error);
                return ControlFlow::Break(());
            }
            MarkupToken::Text(data) => {
                if let AnchorState::OpenAnchor { text, .. } = &mut self.state {
                    text.push_str(&data);
                }
            }
            MarkupToken::StartTag { name, attributes } if name == "a" => {
                if attributes.is_empty() {
                    return ControlFlow::Continue(());
                }
                // A nested start tag replaces the remembered attributes
                let text = match std::mem::replace(&mut self.state, AnchorState::Idle) {
                    AnchorState::OpenAnchor { text, .. } => text,
                    AnchorState::Idle => String::new(),
                };
                self.state = AnchorState::OpenAnchor { attributes, text };
            }
            MarkupToken::EndTag { name } if name == "a" => self.close_anchor(),
            MarkupToken::StartTag { .. } | MarkupToken::EndTag { .. } => {}
        }

        ControlFlow::Continue(())
    }

    fn close_anchor(&mut self) {
        match std::mem::replace(&mut self.state, AnchorState::Idle) {
            AnchorState::Idle => {
                tracing::warn!("Link end found without start");
            }
            AnchorState::OpenAnchor { attributes, text } => {
                let link = Link::from_anchor(&attributes, &text, self.depth);
                if self.policy.is_valid(&link) {
                    tracing::debug!("Link Found {:?}", link);
                    self.links.push(link);
                }
            }
        }
    }

    pub fn into_links(self) -> Vec<Link> {
        tracing::debug!(
            "Extracted {} links at depth {}: {:?}",
            self.links.len(),
            self.depth,
            self.links
        );
        self.links
    }
}

/// Runs the extractor over an already tokenized stream
pub fn extract_from_tokens<I>(tokens: I, depth: u32, policy: LinkPolicy) -> Vec<Link>
where
    I: IntoIterator<Item = MarkupToken>,
{
    let mut extractor = LinkExtractor::new(depth, policy);
    for token in tokens {
        if extractor.process(token).is_break() {
            break;
        }
    }
    extractor.into_links()
}

/// Extracts links from an in-memory document
pub fn extract_links_from_str(html: &str, depth: u32, policy: LinkPolicy) -> Vec<Link> {
    extract_from_tokens(crate::crawler::tokenizer::tokenize(html), depth, policy)
}

/// Extracts links from a response body, reading it exactly once
///
/// Chunks are tokenized as they arrive. A read failure ends the pass like
/// end of input does. The body is consumed and released on every path.
pub async fn extract_links(mut body: PageBody, depth: u32, policy: LinkPolicy) -> Vec<Link> {
    let mut tokenizer = MarkupTokenizer::new();
    let mut extractor = LinkExtractor::new(depth, policy);

    loop {
        let tokens = match body.next_chunk().await {
            Ok(Some(chunk)) => tokenizer.feed(&chunk),
            Ok(None) => tokenizer.finish(),
            Err(error) => {
                tracing::debug!("Body of {} ({}) broke off", body.url(), body.status());
                vec![MarkupToken::Error(error.to_string())]
            }
        };

        for token in tokens {
            if extractor.process(token).is_break() {
                drop(body);
                return extractor.into_links();
            }
        }
    }
}
