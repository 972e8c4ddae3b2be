//! Reflow reconciler: wrap detection across layout passes.
//!
//! Line breaking is a function of the entire current string, so any
//! mid-stream append can silently relocate previously placed rectangles.
//! The reconciler tracks one anchor character (the last character of the
//! previously observed text) and compares its line index against the new
//! layout. When the anchor wrapped down, in-flight reveals on its old line
//! are stale and computation must restart from the anchor's new line start
//! instead of the raw append offset.

use crate::layout::TextLayout;

/// What the caller should do after a relayout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowDecision {
    /// No wrap occurred: keep processing incrementally from `from`.
    Continue {
        /// First unprocessed character offset.
        from: usize,
    },
    /// Appended text pushed the anchor onto a new line.
    Rewrap {
        /// Start of the anchor's new line; recompute rectangles from here.
        restart_from: usize,
        /// The anchor's previous line index. Active rectangles on this
        /// line with progress below 1.0 must be cancelled.
        stale_line: usize,
    },
}

/// Tracks the reveal anchor across layout passes.
#[derive(Debug, Default)]
pub struct ReflowReconciler {
    /// Last character of the previously observed text and its line index.
    anchor: Option<(usize, usize)>,
    /// Next unprocessed character offset.
    processed_end: usize,
}

impl ReflowReconciler {
    /// Create a reconciler that has observed no text yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unprocessed character offset.
    pub const fn processed_end(&self) -> usize {
        self.processed_end
    }

    /// Forget all observed state.
    pub fn reset(&mut self) {
        self.anchor = None;
        self.processed_end = 0;
    }

    /// Compare the anchor against a fresh layout and decide how to resume.
    ///
    /// Advances the internal bookkeeping: after this call the anchor is
    /// the last character of the current text and the whole text counts as
    /// processed (the caller computes rectangles for the returned range
    /// immediately).
    pub fn reconcile(&mut self, layout: &dyn TextLayout) -> ReflowDecision {
        let len = layout.char_count();
        let resume_from = self.processed_end.min(len);

        let decision = match self.anchor {
            Some((offset, old_line)) if offset < len => {
                let new_line = layout.line_for_offset(offset);
                if new_line > old_line {
                    let restart_from = layout.line(new_line).map_or(0, |l| l.start);
                    log::debug!(
                        "anchor {offset} wrapped from line {old_line} to {new_line}, \
                         restarting at {restart_from}"
                    );
                    ReflowDecision::Rewrap {
                        restart_from,
                        stale_line: old_line,
                    }
                } else {
                    ReflowDecision::Continue { from: resume_from }
                }
            }
            _ => ReflowDecision::Continue { from: resume_from },
        };

        self.processed_end = len;
        self.anchor = if len == 0 {
            None
        } else {
            let last = len - 1;
            Some((last, layout.line_for_offset(last)))
        };
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MonospaceLayout;

    #[test]
    fn test_first_observation_starts_at_zero() {
        let mut reconciler = ReflowReconciler::new();
        let layout = MonospaceLayout::new("hello", 20);
        assert_eq!(
            reconciler.reconcile(&layout),
            ReflowDecision::Continue { from: 0 }
        );
        assert_eq!(reconciler.processed_end(), 5);
    }

    #[test]
    fn test_append_without_wrap_continues() {
        let mut reconciler = ReflowReconciler::new();
        reconciler.reconcile(&MonospaceLayout::new("hello", 20));
        let decision = reconciler.reconcile(&MonospaceLayout::new("hello world", 20));
        assert_eq!(decision, ReflowDecision::Continue { from: 5 });
    }

    #[test]
    fn test_append_causing_wrap_restarts_at_new_line() {
        let mut reconciler = ReflowReconciler::new();

        // "The big gray ele" fits on one 16-column line; the anchor is the
        // final 'e' on line 0.
        reconciler.reconcile(&MonospaceLayout::new("The big gray ele", 16));

        // Completing the word wraps "elephant" whole onto line 1, taking
        // the anchor with it. Computation restarts at the new line start
        // (offset 13), not the raw append offset (16).
        let decision = reconciler.reconcile(&MonospaceLayout::new("The big gray elephant", 16));
        assert_eq!(
            decision,
            ReflowDecision::Rewrap {
                restart_from: 13,
                stale_line: 0,
            }
        );
    }

    #[test]
    fn test_anchor_advances_after_rewrap() {
        let mut reconciler = ReflowReconciler::new();
        reconciler.reconcile(&MonospaceLayout::new("The big gray ele", 16));
        reconciler.reconcile(&MonospaceLayout::new("The big gray elephant", 16));

        // Next append without a wrap resumes incrementally.
        let decision = reconciler.reconcile(&MonospaceLayout::new("The big gray elephant!", 16));
        assert!(matches!(decision, ReflowDecision::Continue { from: 21 }));
    }

    #[test]
    fn test_reset_forgets_anchor() {
        let mut reconciler = ReflowReconciler::new();
        reconciler.reconcile(&MonospaceLayout::new("hello world", 20));
        reconciler.reset();
        assert_eq!(
            reconciler.reconcile(&MonospaceLayout::new("hi", 20)),
            ReflowDecision::Continue { from: 0 }
        );
    }

    #[test]
    fn test_shrunk_text_clamps_resume_offset() {
        let mut reconciler = ReflowReconciler::new();
        reconciler.reconcile(&MonospaceLayout::new("hello world", 20));
        let decision = reconciler.reconcile(&MonospaceLayout::new("hi", 20));
        assert_eq!(decision, ReflowDecision::Continue { from: 2 });
    }
}
