//! Streaming: markdown-safe chunking and the reveal session pipeline.

mod session;
mod tokenizer;

pub use session::{RevealSession, SessionConfig};
pub use tokenizer::{safe_chunks, Delimiters, MarkdownTokenizer, SafeChunks, TokenizerConfig};
