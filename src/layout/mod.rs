//! Text layout: the seam between host text shaping and reveal geometry.
//!
//! The reveal pipeline never inspects strings directly; it works against
//! the [`TextLayout`] trait, which exposes the two things the geometry
//! needs: per-character bounding boxes and per-line metrics. A layout is an
//! immutable snapshot of one shaping pass — it is superseded wholesale
//! whenever the text changes, never mutated.
//!
//! [`MonospaceLayout`] is the bundled implementation: a greedy
//! word-wrapping layout over a fixed column budget, sufficient for
//! terminal-style hosts and for exercising the full pipeline in tests.

mod metrics;
mod monospace;

pub use metrics::LineMetrics;
pub use monospace::MonospaceLayout;

use crate::geometry::Rect;

/// An immutable snapshot of laid-out text.
///
/// Offsets are indices into the source string's `char` sequence. All
/// methods are total: out-of-range offsets yield `None` or a clamped
/// cursor position, never a panic.
pub trait TextLayout {
    /// Number of characters in the laid-out text.
    fn char_count(&self) -> usize;

    /// Number of lines. At least 1, even for empty text.
    fn line_count(&self) -> usize;

    /// Metrics for the line at `index`.
    fn line(&self, index: usize) -> Option<&LineMetrics>;

    /// Index of the line containing the character at `offset`.
    ///
    /// Offsets at or past the end of the text map to the last line.
    fn line_for_offset(&self, offset: usize) -> usize;

    /// The character at `offset`, if in bounds.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Bounding box of the character at `offset`.
    ///
    /// Zero-width characters (line-break markers, boundary positions)
    /// report a box with `width() == 0.0`; callers substitute
    /// [`cursor_rect`](Self::cursor_rect) for those.
    fn char_box(&self, offset: usize) -> Option<Rect>;

    /// Text-cursor rectangle at `offset`.
    ///
    /// Offsets past the end of the text place the cursor after the last
    /// character. Always has positive width and height.
    fn cursor_rect(&self, offset: usize) -> Rect;
}
