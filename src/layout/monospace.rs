//! Monospace layout: greedy word-wrapping over a fixed column budget.

use super::{LineMetrics, TextLayout};
use crate::geometry::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Cursor width as a fraction of the cell width.
const CURSOR_FRACTION: f32 = 0.1;

/// Position of a single character within the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CharPos {
    /// The character itself.
    ch: char,
    /// Line the character was placed on.
    line: usize,
    /// Left edge in layout coordinates.
    left: f32,
    /// Advance width. Zero for break markers and other zero-width chars.
    width: f32,
}

/// A laid-out monospace text block.
///
/// Performs greedy word wrapping against a column budget: a word that would
/// overflow the current line moves to the next line whole, and a word wider
/// than the whole budget is broken character by character. Hard `\n` breaks
/// always end a line; the `\n` itself occupies a zero-width box at the
/// trailing edge of the line it terminates.
///
/// The layout is a value snapshot: building it twice from the same text and
/// budget yields identical geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceLayout {
    cell_width: f32,
    line_height: f32,
    max_width: f32,
    chars: Vec<CharPos>,
    lines: Vec<LineMetrics>,
}

impl MonospaceLayout {
    /// Lay out `text` against a column budget with unit cell size.
    pub fn new(text: &str, max_columns: u16) -> Self {
        Self::with_scale(text, max_columns, 1.0, 1.0)
    }

    /// Lay out `text` with explicit cell dimensions.
    ///
    /// `cell_width` and `line_height` must be positive; non-positive values
    /// are clamped to a small epsilon rather than rejected.
    pub fn with_scale(text: &str, max_columns: u16, cell_width: f32, line_height: f32) -> Self {
        let cell_width = cell_width.max(f32::EPSILON);
        let line_height = line_height.max(f32::EPSILON);
        let max_width = f32::from(max_columns.max(1)) * cell_width;

        let mut layout = Self {
            cell_width,
            line_height,
            max_width,
            chars: Vec::new(),
            lines: Vec::new(),
        };
        layout.build(text);
        layout
    }

    /// Column budget in layout units.
    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Advance width of a single character.
    fn advance(&self, ch: char) -> f32 {
        let cols = UnicodeWidthChar::width(ch).unwrap_or(0);
        // monospace: u32 cast is exact for the 0..=2 column range
        #[allow(clippy::cast_precision_loss)]
        let cols = cols as f32;
        cols * self.cell_width
    }

    fn build(&mut self, text: &str) {
        let mut x = 0.0_f32;
        let mut line_start = 0_usize;
        let mut offset = 0_usize;

        for segment in text.split_word_bounds() {
            let has_break = segment.contains('\n');

            // Wrap whole words: a non-whitespace segment that overflows the
            // current line but fits on a fresh one starts a new line.
            if !has_break && x > 0.0 {
                let seg_width: f32 = segment.chars().map(|c| self.advance(c)).sum();
                let is_word = !segment.chars().all(char::is_whitespace);
                if is_word && x + seg_width > self.max_width && seg_width <= self.max_width {
                    self.push_line(line_start, offset, x);
                    line_start = offset;
                    x = 0.0;
                }
            }

            for ch in segment.chars() {
                if ch == '\n' {
                    // Break marker: zero-width box at the trailing edge of
                    // the line it terminates.
                    self.chars.push(CharPos {
                        ch,
                        line: self.lines.len(),
                        left: x,
                        width: 0.0,
                    });
                    offset += 1;
                    self.push_line(line_start, offset, x);
                    line_start = offset;
                    x = 0.0;
                    continue;
                }

                let width = self.advance(ch);
                if width > 0.0 && x > 0.0 && x + width > self.max_width {
                    // Character overflow: break mid-word.
                    self.push_line(line_start, offset, x);
                    line_start = offset;
                    x = 0.0;
                }
                self.chars.push(CharPos {
                    ch,
                    line: self.lines.len(),
                    left: x,
                    width,
                });
                x += width;
                offset += 1;
            }
        }

        // Final line, possibly empty (trailing newline or empty text).
        self.push_line(line_start, offset, x);
    }

    fn push_line(&mut self, start: usize, end: usize, right: f32) {
        let index = self.lines.len();
        #[allow(clippy::cast_precision_loss)]
        let top = index as f32 * self.line_height;
        self.lines.push(LineMetrics {
            index,
            start,
            end,
            left: 0.0,
            top,
            right,
            bottom: top + self.line_height,
        });
    }
}

impl TextLayout for MonospaceLayout {
    fn char_count(&self) -> usize {
        self.chars.len()
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&LineMetrics> {
        self.lines.get(index)
    }

    fn line_for_offset(&self, offset: usize) -> usize {
        let idx = self.lines.partition_point(|l| l.end <= offset);
        idx.min(self.lines.len() - 1)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).map(|pos| pos.ch)
    }

    fn char_box(&self, offset: usize) -> Option<Rect> {
        let pos = self.chars.get(offset)?;
        let line = &self.lines[pos.line];
        Some(Rect::new(pos.left, line.top, pos.left + pos.width, line.bottom))
    }

    fn cursor_rect(&self, offset: usize) -> Rect {
        let width = self.cell_width * CURSOR_FRACTION;
        if let Some(pos) = self.chars.get(offset) {
            let line = &self.lines[pos.line];
            return Rect::new(pos.left, line.top, pos.left + width, line.bottom);
        }
        // Past the end: cursor sits after the last glyph on the last line.
        let line = &self.lines[self.lines.len() - 1];
        Rect::new(line.right, line.top, line.right + width, line.bottom)
    }
}
