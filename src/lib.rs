//! # Cascade
//!
//! A staggered text-reveal engine for streaming token output.
//!
//! Cascade turns an incrementally growing piece of text into animated
//! reveal rectangles: each delta from a token stream is laid out,
//! diffed against the previous wrap, converted to per-line rectangles,
//! and animated in with a configurable stagger, duration, and linger.
//!
//! ## Core Concepts
//!
//! - **Incremental rect calculation**: only the appended range is
//!   converted to rectangles, segmented by line, word, or fixed chunk
//! - **Reflow reconciliation**: when word wrap relocates the tail of
//!   the text, stale in-flight reveals are cancelled and rescheduled
//! - **Markdown-safe chunking**: deltas that leave a `**`, `~~`, or
//!   backtick delimiter dangling are held until the closer arrives
//! - **Actor shell**: a ticker and a dispatcher thread wrap the whole
//!   pipeline behind channels for multi-threaded hosts
//!
//! ## Example
//!
//! ```rust,ignore
//! use cascade::{RevealSession, SessionConfig};
//!
//! let mut session = RevealSession::new(80, SessionConfig::default());
//! session.push_delta("Hello, ", &mut ());
//! session.push_delta("world", &mut ());
//! session.tick(std::time::Duration::from_millis(16), &mut ());
//! for rect in session.snapshot() {
//!     // draw rect.rect at rect.progress opacity
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod geometry;
pub mod layout;
pub mod reveal;
pub mod stream;

// Re-exports for convenience
pub use actor::{EngineConfig, RevealCommand, RevealEngine, RevealEvent};
pub use geometry::Rect;
pub use layout::{LineMetrics, MonospaceLayout, TextLayout};
pub use reveal::{
    rects_for_range, Easing, RectKey, RectSnapshot, RevealConfig, RevealDriver, RevealObserver,
    RevealRect, Segmentation,
};
pub use stream::{safe_chunks, MarkdownTokenizer, RevealSession, SessionConfig, TokenizerConfig};
