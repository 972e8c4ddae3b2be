//! Incremental rect calculator: character ranges to layout rectangles.
//!
//! Given a laid-out text and an inclusive character range, produces the
//! ordered list of rectangles that visually cover that range, one or more
//! per line. This is the geometric core of the reveal pipeline: every
//! newly streamed range passes through here before being animated.

use crate::geometry::Rect;
use crate::layout::{LineMetrics, TextLayout};

/// Quantization factor for identity keys (1/16th of a layout unit).
const KEY_QUANTUM: f32 = 16.0;

/// How a line's sub-range is split into reveal rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Segmentation {
    /// One rectangle per line.
    #[default]
    Line,
    /// One rectangle per run of word characters (letters, digits,
    /// underscore) or separator characters. Runs alternate, so the union
    /// of the produced rectangles still covers the whole range.
    Word,
    /// Fixed-size character chunks. A size of zero behaves like 1.
    Chunk(usize),
}

/// Stable identity of a reveal rectangle.
///
/// Derived from the character range, line index and quantized position so
/// that re-delivering the same geometry never schedules a second
/// animation, while a reflowed rectangle (same range, new position) gets a
/// fresh identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectKey {
    start: usize,
    end: usize,
    line: usize,
    left_q: i32,
    top_q: i32,
}

/// A rectangle covering an inclusive character range on one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealRect {
    /// Covering rectangle, vertically snapped to the line.
    pub rect: Rect,
    /// First character offset covered (inclusive).
    pub start: usize,
    /// Last character offset covered (inclusive).
    pub end: usize,
    /// Line index the rectangle was derived from.
    pub line: usize,
}

impl RevealRect {
    /// Identity key for idempotent scheduling.
    pub fn key(&self) -> RectKey {
        #[allow(clippy::cast_possible_truncation)]
        let quantize = |v: f32| (v * KEY_QUANTUM).round() as i32;
        RectKey {
            start: self.start,
            end: self.end,
            line: self.line,
            left_q: quantize(self.rect.left),
            top_q: quantize(self.rect.top),
        }
    }
}

/// Compute the rectangles covering `start..=end` in the given layout.
///
/// Offsets are clamped into the text bounds; empty text or an inverted
/// range yields an empty list. No returned rectangle has non-positive
/// width or height. Calling twice with the same layout and range yields
/// geometrically identical output.
pub fn rects_for_range(
    layout: &dyn TextLayout,
    start: usize,
    end: usize,
    segmentation: Segmentation,
) -> Vec<RevealRect> {
    let len = layout.char_count();
    if len == 0 || start > end {
        return Vec::new();
    }
    let start = start.min(len - 1);
    let end = end.min(len - 1);

    let first_line = layout.line_for_offset(start);
    let last_line = layout.line_for_offset(end);

    let mut out = Vec::new();
    for line_ix in first_line..=last_line {
        let Some(line) = layout.line(line_ix) else {
            continue;
        };
        if line.is_empty() {
            continue;
        }
        // First line runs from the range start to the line's visual end;
        // the last line runs up to the range end; interior lines span
        // their full visible extent. The clamps below produce all three.
        let s = start.max(line.start);
        let e = end.min(line.last_visible_offset());
        if s > e {
            continue;
        }
        segment_line(layout, line, s, e, segmentation, &mut out);
    }
    out
}

/// Split one line's sub-range according to the segmentation mode.
fn segment_line(
    layout: &dyn TextLayout,
    line: &LineMetrics,
    s: usize,
    e: usize,
    segmentation: Segmentation,
    out: &mut Vec<RevealRect>,
) {
    match segmentation {
        Segmentation::Line => {
            out.extend(box_range(layout, line, s, e));
        }
        Segmentation::Word => {
            let mut run_start = s;
            let mut run_is_word = is_word_char(layout.char_at(s));
            for i in (s + 1)..=e {
                let w = is_word_char(layout.char_at(i));
                if w != run_is_word {
                    out.extend(box_range(layout, line, run_start, i - 1));
                    run_start = i;
                    run_is_word = w;
                }
            }
            out.extend(box_range(layout, line, run_start, e));
        }
        Segmentation::Chunk(size) => {
            let size = size.max(1);
            let mut chunk_start = s;
            while chunk_start <= e {
                let chunk_end = (chunk_start + size - 1).min(e);
                out.extend(box_range(layout, line, chunk_start, chunk_end));
                chunk_start = chunk_end + 1;
            }
        }
    }
}

/// Box an inclusive sub-range known to lie on a single line.
///
/// Unions the endpoint boxes and snaps the vertical extent to the line,
/// which keeps rectangles stable across sub-pixel glyph differences.
/// Degenerate output is dropped.
fn box_range(
    layout: &dyn TextLayout,
    line: &LineMetrics,
    s: usize,
    e: usize,
) -> Option<RevealRect> {
    let start_box = box_or_cursor(layout, s);
    let end_box = box_or_cursor(layout, e);
    let rect = start_box
        .union(&end_box)
        .with_vertical(line.top, line.bottom);
    if rect.is_degenerate() {
        return None;
    }
    Some(RevealRect {
        rect,
        start: s,
        end: e,
        line: line.index,
    })
}

/// Bounding box of a character, falling back to the cursor rectangle when
/// the box has no width (break markers, boundary positions).
fn box_or_cursor(layout: &dyn TextLayout, offset: usize) -> Rect {
    match layout.char_box(offset) {
        Some(b) if b.width() > 0.0 => b,
        _ => layout.cursor_rect(offset),
    }
}

fn is_word_char(ch: Option<char>) -> bool {
    ch.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MonospaceLayout;

    #[test]
    fn test_empty_text_yields_nothing() {
        let layout = MonospaceLayout::new("", 10);
        assert!(rects_for_range(&layout, 0, 5, Segmentation::Line).is_empty());
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let layout = MonospaceLayout::new("hello", 10);
        assert!(rects_for_range(&layout, 3, 1, Segmentation::Line).is_empty());
    }

    #[test]
    fn test_single_line_range() {
        let layout = MonospaceLayout::new("hello", 10);
        let rects = rects_for_range(&layout, 1, 3, Segmentation::Line);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].rect, Rect::new(1.0, 0.0, 4.0, 1.0));
        assert_eq!((rects[0].start, rects[0].end), (1, 3));
        assert_eq!(rects[0].line, 0);
    }

    #[test]
    fn test_offsets_clamped_to_text() {
        let layout = MonospaceLayout::new("abc", 10);
        let rects = rects_for_range(&layout, 0, 99, Segmentation::Line);
        assert_eq!(rects.len(), 1);
        assert_eq!((rects[0].start, rects[0].end), (0, 2));
    }

    #[test]
    fn test_no_degenerate_output() {
        let layout = MonospaceLayout::new("one two three four five", 7);
        for s in 0..23 {
            for e in s..23 {
                for rect in rects_for_range(&layout, s, e, Segmentation::Line) {
                    assert!(rect.rect.width() > 0.0);
                    assert!(rect.rect.height() > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_calculator_is_idempotent() {
        let layout = MonospaceLayout::new("the quick brown fox jumps", 9);
        let a = rects_for_range(&layout, 2, 20, Segmentation::Line);
        let b = rects_for_range(&layout, 2, 20, Segmentation::Line);
        assert_eq!(a, b);
    }

    #[test]
    fn test_two_line_range_spans_both_lines() {
        // "Hello world" / "foo bar": last three chars of line 1 plus the
        // first three of line 2.
        let layout = MonospaceLayout::new("Hello world\nfoo bar", 20);
        let rects = rects_for_range(&layout, 8, 14, Segmentation::Line);
        assert_eq!(rects.len(), 2);

        // "rld" through the visual end of line 1. The trailing `\n` is
        // zero-width, so the cursor rectangle stands in for it.
        assert_eq!(rects[0].line, 0);
        assert_eq!(rects[0].rect.left, 8.0);
        assert!((rects[0].rect.right - 11.1).abs() < 1e-4);
        assert_eq!(rects[0].rect.top, 0.0);
        assert_eq!(rects[0].rect.bottom, 1.0);

        // Start of line 2 through the box after "foo".
        assert_eq!(rects[1].line, 1);
        assert_eq!(rects[1].rect, Rect::new(0.0, 1.0, 3.0, 2.0));
        assert_eq!((rects[1].start, rects[1].end), (12, 14));
    }

    #[test]
    fn test_interior_line_spans_full_width() {
        let layout = MonospaceLayout::new("aaa\nbbbb\ncc", 10);
        let rects = rects_for_range(&layout, 0, 10, Segmentation::Line);
        assert_eq!(rects.len(), 3);
        let middle = &rects[1];
        assert_eq!(middle.line, 1);
        assert_eq!(middle.rect.left, 0.0);
        // Full visible width plus the cursor sliver standing in for the
        // zero-width break marker.
        assert!(middle.rect.right >= 4.0);
    }

    #[test]
    fn test_newline_only_range_uses_cursor_rect() {
        let layout = MonospaceLayout::new("ab\ncd", 10);
        let rects = rects_for_range(&layout, 2, 2, Segmentation::Line);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].rect.left, 2.0);
        assert!(rects[0].rect.width() > 0.0);
    }

    #[test]
    fn test_word_segmentation_covers_range() {
        let layout = MonospaceLayout::new("foo bar_baz! x", 20);
        let rects = rects_for_range(&layout, 0, 13, Segmentation::Word);
        // "foo", " ", "bar_baz", "! ", "x"
        assert_eq!(rects.len(), 5);
        assert_eq!((rects[0].start, rects[0].end), (0, 2));
        assert_eq!((rects[2].start, rects[2].end), (4, 10));
        // Union covers the whole range with no gaps.
        let mut next = 0;
        for rect in &rects {
            assert_eq!(rect.start, next);
            next = rect.end + 1;
        }
        assert_eq!(next, 14);
    }

    #[test]
    fn test_chunk_segmentation() {
        let layout = MonospaceLayout::new("abcdefgh", 20);
        let rects = rects_for_range(&layout, 0, 7, Segmentation::Chunk(3));
        assert_eq!(rects.len(), 3);
        assert_eq!((rects[0].start, rects[0].end), (0, 2));
        assert_eq!((rects[1].start, rects[1].end), (3, 5));
        assert_eq!((rects[2].start, rects[2].end), (6, 7));
    }

    #[test]
    fn test_chunk_size_zero_behaves_like_one() {
        let layout = MonospaceLayout::new("abc", 20);
        let rects = rects_for_range(&layout, 0, 2, Segmentation::Chunk(0));
        assert_eq!(rects.len(), 3);
    }

    #[test]
    fn test_keys_stable_and_distinct() {
        let layout = MonospaceLayout::new("hello world", 20);
        let a = rects_for_range(&layout, 0, 4, Segmentation::Line);
        let b = rects_for_range(&layout, 0, 4, Segmentation::Line);
        assert_eq!(a[0].key(), b[0].key());

        let c = rects_for_range(&layout, 6, 10, Segmentation::Line);
        assert_ne!(a[0].key(), c[0].key());

        // Same range at a new position (reflow) gets a fresh identity.
        let rewrapped = MonospaceLayout::new("hello world", 8);
        let d = rects_for_range(&rewrapped, 6, 10, Segmentation::Line);
        assert_ne!(c[0].key(), d[0].key());
    }
}
