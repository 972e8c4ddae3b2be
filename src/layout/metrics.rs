//! Per-line metrics exposed by a laid-out text.

/// Metrics for a single laid-out line.
///
/// Character offsets are indices into the source string's `char` sequence.
/// `end` is exclusive and includes any trailing zero-width break marker
/// (e.g. a `\n`) that terminated the line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMetrics {
    /// Zero-based line index.
    pub index: usize,
    /// First character offset on the line.
    pub start: usize,
    /// One past the last character offset on the line.
    pub end: usize,
    /// Left edge of the line's visible content.
    pub left: f32,
    /// Top edge of the line.
    pub top: f32,
    /// Right edge of the last visible glyph on the line.
    pub right: f32,
    /// Bottom edge of the line.
    pub bottom: f32,
}

impl LineMetrics {
    /// Number of characters on the line (including break markers).
    pub fn char_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check whether the line holds no characters at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Last character offset that may carry a visible glyph.
    ///
    /// The exclusive end is stepped back by one and clamped to the line
    /// start, so a line whose final character is a zero-width break marker
    /// never reports a visible glyph past its content.
    pub fn last_visible_offset(&self) -> usize {
        self.end.saturating_sub(1).max(self.start)
    }

    /// Check whether a character offset falls on this line.
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}
