//! Streaming markup tokenizer
//!
//! Wraps the html5ever tokenizer so a response body can be fed to it chunk by
//! chunk. Each call to [`MarkupTokenizer::feed`] yields the tokens that became
//! available from that chunk, in document order. The stream ends with a single
//! [`MarkupToken::End`] once [`MarkupTokenizer::finish`] is called.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::cell::RefCell;

/// A name/value pair taken from a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Lexical unit handed to the link extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    /// An opening tag with its attributes; names are lowercase
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
    },

    /// A closing tag
    EndTag { name: String },

    /// A run of character data
    Text(String),

    /// The input could not be read any further
    Error(String),

    /// End of input
    End,
}

impl MarkupToken {
    /// True for the tokens after which nothing else follows
    pub fn is_terminal(&self) -> bool {
        matches!(self, MarkupToken::End | MarkupToken::Error(_))
    }
}

/// Collects html5ever tokens as [`MarkupToken`]s until they are drained
#[derive(Default)]
struct TokenCollector {
    tokens: RefCell<Vec<MarkupToken>>,
}

impl TokenCollector {
    fn push(&self, token: MarkupToken) {
        let mut tokens = self.tokens.borrow_mut();

        // html5ever splits character data at arbitrary points; merge adjacent runs
        if let (MarkupToken::Text(next), Some(MarkupToken::Text(last))) = (&token, tokens.last_mut())
        {
            last.push_str(next);
            return;
        }

        tokens.push(token);
    }

    fn drain(&self) -> Vec<MarkupToken> {
        std::mem::take(&mut *self.tokens.borrow_mut())
    }
}

impl TokenSink for TokenCollector {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attributes = tag
                            .attrs
                            .iter()
                            .map(|attr| Attribute {
                                name: attr.name.local.to_string(),
                                value: attr.value.to_string(),
                            })
                            .collect();
                        let text_mode = raw_text_mode(&name);
                        self.push(MarkupToken::StartTag { name, attributes });

                        // Without a tree builder the tokenizer has to be told
                        // where element content stops being markup
                        if !tag.self_closing {
                            if let Some(mode) = text_mode {
                                return mode;
                            }
                        }
                    }
                    TagKind::EndTag => self.push(MarkupToken::EndTag { name }),
                }
            }
            Token::CharacterTokens(text) => self.push(MarkupToken::Text(text.to_string())),
            Token::NullCharacterToken => self.push(MarkupToken::Text('\u{FFFD}'.to_string())),
            Token::EOFToken => self.push(MarkupToken::End),
            Token::ParseError(error) => {
                tracing::trace!("Recoverable markup error: {}", error);
            }
            Token::DoctypeToken(_) | Token::CommentToken(_) => {}
        }

        TokenSinkResult::Continue
    }
}

/// Elements whose content is raw text rather than markup
fn raw_text_mode(name: &str) -> Option<TokenSinkResult<()>> {
    let kind = match name {
        "script" => RawKind::ScriptData,
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => RawKind::Rawtext,
        "textarea" | "title" => RawKind::Rcdata,
        "plaintext" => return Some(TokenSinkResult::Plaintext),
        _ => return None,
    };
    Some(TokenSinkResult::RawData(kind))
}

/// Incremental UTF-8 decoder that carries split code points across chunks
#[derive(Debug, Default)]
struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(error) => {
                    let valid = error.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

                    match error.error_len() {
                        Some(invalid) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            // Incomplete sequence at the tail; wait for more bytes
                            self.pending.drain(..valid);
                            return out;
                        }
                    }
                }
            }
        }
    }

    fn flush(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

/// Forward-only tokenizer over a byte stream delivered in chunks
pub struct MarkupTokenizer {
    inner: Tokenizer<TokenCollector>,
    input: BufferQueue,
    decoder: Utf8Chunker,
    finished: bool,
}

impl MarkupTokenizer {
    pub fn new() -> Self {
        Self {
            inner: Tokenizer::new(TokenCollector::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
            decoder: Utf8Chunker::default(),
            finished: false,
        }
    }

    /// Feeds the next chunk of the body and returns the tokens it completed
    ///
    /// Tokens that straddle the chunk boundary are held back until a later
    /// chunk (or [`MarkupTokenizer::finish`]) completes them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<MarkupToken> {
        if self.finished {
            return Vec::new();
        }

        let text = self.decoder.decode(bytes);
        self.push_text(text);
        self.inner.sink.drain()
    }

    /// Signals end of input and returns the remaining tokens
    ///
    /// The returned sequence always ends with [`MarkupToken::End`]. Calling
    /// this more than once yields nothing further.
    pub fn finish(&mut self) -> Vec<MarkupToken> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        let rest = self.decoder.flush();
        self.push_text(rest);
        self.inner.end();

        let mut tokens = self.inner.sink.drain();
        if !matches!(tokens.last(), Some(MarkupToken::End)) {
            tokens.push(MarkupToken::End);
        }
        tokens
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from(text));
        let _ = self.inner.feed(&self.input);
    }
}

impl Default for MarkupTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizes a complete document in one call
pub fn tokenize(html: &str) -> Vec<MarkupToken> {
    let mut tokenizer = MarkupTokenizer::new();
    let mut tokens = tokenizer.feed(html.as_bytes());
    tokens.extend(tokenizer.finish());
    tokens
}
