//! Markdown-safe tokenizer: chunking a token stream without splitting
//! delimiter pairs.
//!
//! Incoming fragments arrive at arbitrary boundaries (`"**bo"`, `"ld**"`),
//! so emitting them as-is would let downstream layout render half a
//! delimiter pair and reflow once the closer arrives. The tokenizer
//! buffers fragments and emits a forward-only sequence of chunks such
//! that no chunk boundary falls inside an unterminated pair.
//!
//! Liveness beats fidelity: an opener with no closer before the next
//! newline degrades to literal text instead of stalling the stream.

use bitflags::bitflags;
use std::collections::VecDeque;

bitflags! {
    /// Markdown delimiters the tokenizer pairs up.
    ///
    /// Used to report which delimiter currently blocks emission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Delimiters: u8 {
        /// `**`
        const BOLD = 0b0000_0001;
        /// `__`
        const UNDERSCORE = 0b0000_0010;
        /// `~~`
        const STRIKE = 0b0000_0100;
        /// `` ` ``
        const CODE = 0b0000_1000;
        /// ```` ``` ````
        const FENCE = 0b0001_0000;
    }
}

/// Configuration for the tokenizer.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Treat ```` ``` ```` as a fence delimiter. A fenced span is emitted
    /// as one atomic chunk, newlines included, and the fail-open-at-newline
    /// rule is suspended until its closer.
    pub fences: bool,
    /// Absorb one trailing space into each word token to reduce chunk
    /// count.
    pub absorb_trailing_space: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            fences: true,
            absorb_trailing_space: true,
        }
    }
}

/// Paired delimiter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Bold,
    Underscore,
    Strike,
    Code,
    Fence,
}

impl Delimiter {
    const fn token(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Underscore => "__",
            Self::Strike => "~~",
            Self::Code => "`",
            Self::Fence => "```",
        }
    }

    const fn flag(self) -> Delimiters {
        match self {
            Self::Bold => Delimiters::BOLD,
            Self::Underscore => Delimiters::UNDERSCORE,
            Self::Strike => Delimiters::STRIKE,
            Self::Code => Delimiters::CODE,
            Self::Fence => Delimiters::FENCE,
        }
    }
}

/// What the scanner sees at a buffer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classified {
    /// A confirmed opening delimiter.
    Open(Delimiter),
    /// A possible delimiter prefix cut off by the buffer end; needs more
    /// input to decide (`"*"` might become `"**"`).
    Ambiguous,
    /// Plain text.
    Text,
}

/// How an open delimiter resolves against the buffered tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// Closer found: emit the whole span atomically (`content_len` bytes
    /// between the delimiters).
    Span { content_len: usize },
    /// No closer yet and no reason to give up: hold the buffer.
    Wait,
    /// No closer before the next newline (or end of stream): degrade the
    /// opener to literal text.
    FailOpen,
}

/// Buffers a fragment stream and emits markdown-safe chunks.
///
/// The tokenizer is a pure generator over its input: it holds no state
/// beyond the current unflushed buffer, so concatenating everything
/// emitted by [`push`](Self::push) and [`finish`](Self::finish)
/// reproduces the input exactly.
#[derive(Debug, Default)]
pub struct MarkdownTokenizer {
    config: TokenizerConfig,
    buffer: String,
    dangling: Delimiters,
}

impl MarkdownTokenizer {
    /// Create a tokenizer with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TokenizerConfig::default())
    }

    /// Create a tokenizer with a custom configuration.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            dangling: Delimiters::empty(),
        }
    }

    /// Feed a fragment; returns every chunk that became emittable.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);
        self.drain(false)
    }

    /// Flush the stream end: everything still buffered is emitted, with
    /// unclosed delimiters degraded to literal text.
    pub fn finish(&mut self) -> Vec<String> {
        let out = self.drain(true);
        debug_assert!(self.buffer.is_empty());
        out
    }

    /// The delimiter currently blocking emission, if any.
    pub const fn pending_delimiter(&self) -> Delimiters {
        self.dangling
    }

    /// Whether unemitted input is buffered.
    pub fn has_pending_input(&self) -> bool {
        !self.buffer.is_empty()
    }

    fn drain(&mut self, eof: bool) -> Vec<String> {
        let mut out = Vec::new();
        let mut pos = 0;
        self.dangling = Delimiters::empty();

        'scan: while pos < self.buffer.len() {
            let s = &self.buffer[pos..];

            // Newlines are block-structure boundaries: always their own
            // atomic chunk.
            if s.starts_with('\n') {
                out.push("\n".to_owned());
                pos += 1;
                continue;
            }

            match classify(s, eof, self.config.fences) {
                Classified::Ambiguous => break 'scan,
                Classified::Open(kind) => {
                    let token = kind.token();
                    let dlen = token.len();
                    let tail = &s[dlen..];
                    match resolve(tail, kind, eof) {
                        Resolution::Span { content_len } => {
                            let total = dlen + content_len + dlen;
                            out.push(s[..total].to_owned());
                            pos += total;
                        }
                        Resolution::Wait => {
                            self.dangling = kind.flag();
                            break 'scan;
                        }
                        Resolution::FailOpen => {
                            if kind == Delimiter::Fence {
                                // Unclosed fence at stream end: the whole
                                // remainder is the final literal flush.
                                out.push(s.to_owned());
                                pos += s.len();
                            } else {
                                // Merge the opener into the following
                                // plain-text token.
                                let wlen = word_len(tail, eof, self.config.fences).unwrap_or(0);
                                out.push(s[..dlen + wlen].to_owned());
                                pos += dlen + wlen;
                            }
                        }
                    }
                }
                Classified::Text => {
                    let first = s.chars().next().unwrap_or('\0');
                    if first.is_whitespace() {
                        // Non-newline whitespace run.
                        let run: usize = s
                            .chars()
                            .take_while(|&c| c.is_whitespace() && c != '\n')
                            .map(char::len_utf8)
                            .sum();
                        out.push(s[..run].to_owned());
                        pos += run;
                        continue;
                    }
                    let Some(mut wlen) = word_len(s, eof, self.config.fences) else {
                        break 'scan;
                    };
                    if self.config.absorb_trailing_space && s[wlen..].starts_with(' ') {
                        wlen += 1;
                    }
                    out.push(s[..wlen].to_owned());
                    pos += wlen;
                }
            }
        }

        self.buffer.drain(..pos);
        out
    }
}

/// Classify the start of the unemitted buffer.
fn classify(s: &str, eof: bool, fences: bool) -> Classified {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&b @ (b'*' | b'_' | b'~')) => {
            if bytes.len() >= 2 {
                if bytes[1] == b {
                    Classified::Open(match b {
                        b'*' => Delimiter::Bold,
                        b'_' => Delimiter::Underscore,
                        _ => Delimiter::Strike,
                    })
                } else {
                    Classified::Text
                }
            } else if eof {
                Classified::Text
            } else {
                Classified::Ambiguous
            }
        }
        Some(b'`') => {
            if fences {
                let run = bytes.iter().take_while(|&&c| c == b'`').count();
                if run >= 3 {
                    Classified::Open(Delimiter::Fence)
                } else if run == bytes.len() && !eof {
                    // The run touches the buffer end; it may still grow
                    // into a fence.
                    Classified::Ambiguous
                } else {
                    Classified::Open(Delimiter::Code)
                }
            } else {
                Classified::Open(Delimiter::Code)
            }
        }
        _ => Classified::Text,
    }
}

/// Resolve an open delimiter against the text after it.
fn resolve(tail: &str, kind: Delimiter, eof: bool) -> Resolution {
    let token = kind.token();
    if kind == Delimiter::Fence {
        // Fenced spans are multi-line by nature; only the stream end
        // forces a degrade.
        return match tail.find(token) {
            Some(content_len) => Resolution::Span { content_len },
            None if eof => Resolution::FailOpen,
            None => Resolution::Wait,
        };
    }
    let close = tail.find(token);
    let newline = tail.find('\n');
    match (close, newline) {
        (Some(c), Some(n)) if c < n => Resolution::Span { content_len: c },
        (Some(c), None) => Resolution::Span { content_len: c },
        (None, None) if !eof => Resolution::Wait,
        // Newline before the closer, or stream end with none: fail open.
        _ => Resolution::FailOpen,
    }
}

/// Length of the plain word run at the start of `s`.
///
/// Stops at whitespace or a confirmed delimiter. Returns `None` when the
/// run reaches the buffer end (or an ambiguous delimiter prefix) and the
/// stream is still open — the word may yet grow.
fn word_len(s: &str, eof: bool, fences: bool) -> Option<usize> {
    for (i, ch) in s.char_indices() {
        if ch.is_whitespace() {
            return Some(i);
        }
        if i > 0 {
            match classify(&s[i..], eof, fences) {
                Classified::Open(_) => return Some(i),
                Classified::Ambiguous => return None,
                Classified::Text => {}
            }
        }
    }
    if eof {
        Some(s.len())
    } else {
        None
    }
}

/// Lazily re-chunk a fragment iterator into markdown-safe chunks.
///
/// The adapter is forward-only and restartable: build a new one to rescan
/// a source from its beginning. Finite sources get their final flush
/// appended automatically.
pub fn safe_chunks<I>(fragments: I, config: TokenizerConfig) -> SafeChunks<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    SafeChunks {
        source: fragments.into_iter(),
        tokenizer: MarkdownTokenizer::with_config(config),
        ready: VecDeque::new(),
        source_done: false,
    }
}

/// Iterator returned by [`safe_chunks`].
#[derive(Debug)]
pub struct SafeChunks<I: Iterator> {
    source: I,
    tokenizer: MarkdownTokenizer,
    ready: VecDeque<String>,
    source_done: bool,
}

impl<I> Iterator for SafeChunks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(chunk) = self.ready.pop_front() {
                return Some(chunk);
            }
            if self.source_done {
                return None;
            }
            match self.source.next() {
                Some(fragment) => {
                    self.ready.extend(self.tokenizer.push(fragment.as_ref()));
                }
                None => {
                    self.source_done = true;
                    self.ready.extend(self.tokenizer.finish());
                }
            }
        }
    }
}
