//! Reveal session: the full streaming pipeline on one execution context.
//!
//! A session owns every stage of the reveal pipeline and wires them
//! together in delivery order: an incoming delta is (optionally)
//! re-chunked by the markdown tokenizer, appended to the current text,
//! laid out, reconciled against the previous layout for wrap-induced
//! relocation, converted to rectangles for the newly added range, and
//! handed to the driver for staggered reveal.
//!
//! All state is owned and mutated by whoever owns the session; the actor
//! shell runs one on its dispatcher thread.

use std::time::Duration;

use super::tokenizer::{MarkdownTokenizer, TokenizerConfig};
use crate::layout::{MonospaceLayout, TextLayout};
use crate::reveal::{
    rects_for_range, RectSnapshot, ReflowDecision, ReflowReconciler, RevealConfig, RevealDriver,
    RevealObserver,
};

/// Configuration for a reveal session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Driver configuration (stagger, duration, linger, easing,
    /// segmentation).
    pub reveal: RevealConfig,
    /// Tokenizer configuration. `None` disables re-chunking: deltas are
    /// applied to the text verbatim.
    pub tokenizer: Option<TokenizerConfig>,
}

/// The streaming reveal pipeline.
pub struct RevealSession {
    config: SessionConfig,
    tokenizer: Option<MarkdownTokenizer>,
    reconciler: ReflowReconciler,
    driver: RevealDriver,
    text: String,
    layout: MonospaceLayout,
    max_columns: u16,
}

impl RevealSession {
    /// Create a session wrapping text at `max_columns`.
    pub fn new(max_columns: u16, config: SessionConfig) -> Self {
        let tokenizer = config
            .tokenizer
            .clone()
            .map(MarkdownTokenizer::with_config);
        let driver = RevealDriver::new(config.reveal.clone());
        Self {
            config,
            tokenizer,
            reconciler: ReflowReconciler::new(),
            driver,
            text: String::new(),
            layout: MonospaceLayout::new("", max_columns),
            max_columns,
        }
    }

    /// The accumulated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current layout snapshot.
    pub const fn layout(&self) -> &MonospaceLayout {
        &self.layout
    }

    /// The underlying driver.
    pub const fn driver(&self) -> &RevealDriver {
        &self.driver
    }

    /// Feed a delta from the token stream.
    ///
    /// With a tokenizer configured, only markdown-safe chunks reach the
    /// text; a fragment that leaves a delimiter dangling is buffered and
    /// schedules nothing until its closer arrives.
    pub fn push_delta(&mut self, delta: &str, observer: &mut dyn RevealObserver) {
        let chunks = match &mut self.tokenizer {
            Some(tokenizer) => tokenizer.push(delta),
            None => {
                if delta.is_empty() {
                    Vec::new()
                } else {
                    vec![delta.to_owned()]
                }
            }
        };
        self.apply_chunks(&chunks, observer);
    }

    /// Signal the end of the stream.
    ///
    /// Flushes the tokenizer buffer and fixes the final text length the
    /// completion callback fires for.
    pub fn finish(&mut self, observer: &mut dyn RevealObserver) {
        let chunks = match &mut self.tokenizer {
            Some(tokenizer) => tokenizer.finish(),
            None => Vec::new(),
        };
        self.apply_chunks(&chunks, observer);
    }

    /// Change the wrap width, relaying out the full text.
    ///
    /// Width changes relocate arbitrary lines, so this re-anchors rather
    /// than diffing: in-flight animations are left to the reconciler on
    /// the next append.
    pub fn set_width(&mut self, max_columns: u16, observer: &mut dyn RevealObserver) {
        if max_columns == self.max_columns {
            return;
        }
        self.max_columns = max_columns;
        self.relayout(observer);
    }

    /// Advance animations by `dt`.
    pub fn tick(&mut self, dt: Duration, observer: &mut dyn RevealObserver) {
        self.driver.advance(dt, observer);
    }

    /// Drawable snapshots of the active rectangles.
    pub fn snapshot(&self) -> Vec<RectSnapshot> {
        self.driver.snapshot()
    }

    fn apply_chunks(&mut self, chunks: &[String], observer: &mut dyn RevealObserver) {
        if chunks.iter().all(String::is_empty) {
            // Nothing became emittable; no relayout, no scheduling.
            return;
        }
        for chunk in chunks {
            self.text.push_str(chunk);
        }
        self.relayout(observer);
    }

    fn relayout(&mut self, observer: &mut dyn RevealObserver) {
        self.layout = MonospaceLayout::new(&self.text, self.max_columns);
        let len = self.layout.char_count();
        self.driver.set_text_len(len);

        let from = match self.reconciler.reconcile(&self.layout) {
            ReflowDecision::Continue { from } => from,
            ReflowDecision::Rewrap {
                restart_from,
                stale_line,
            } => {
                // Reveals for the relocated tail would draw at stale
                // coordinates; cancel them before rescheduling.
                self.driver.cancel_relocated(stale_line, restart_from);
                restart_from
            }
        };

        if from >= len {
            return;
        }
        let batch = rects_for_range(
            &self.layout,
            from,
            len - 1,
            self.config.reveal.segmentation,
        );
        self.driver.schedule_batch(&batch, observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{RectKey, RevealRect, Segmentation};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn config() -> SessionConfig {
        SessionConfig {
            reveal: RevealConfig {
                stagger: Duration::ZERO,
                duration: ms(100),
                linger: ms(50),
                ..RevealConfig::default()
            },
            tokenizer: None,
        }
    }

    #[derive(Default)]
    struct Recorder {
        added: Vec<RevealRect>,
        removed: Vec<(RectKey, bool)>,
        completions: Vec<usize>,
    }

    impl RevealObserver for Recorder {
        fn on_rect_added(&mut self, rect: &RevealRect) {
            self.added.push(*rect);
        }
        fn on_rect_removed(&mut self, key: RectKey, cancelled: bool) {
            self.removed.push((key, cancelled));
        }
        fn on_complete(&mut self, text_len: usize) {
            self.completions.push(text_len);
        }
    }

    #[test]
    fn test_deltas_schedule_rects() {
        let mut session = RevealSession::new(40, config());
        let mut obs = Recorder::default();

        session.push_delta("hello ", &mut obs);
        assert_eq!(obs.added.len(), 1);
        session.push_delta("world", &mut obs);
        assert_eq!(obs.added.len(), 2);
        assert_eq!(session.text(), "hello world");

        // The second batch covers exactly the appended range.
        assert_eq!((obs.added[1].start, obs.added[1].end), (6, 10));
    }

    #[test]
    fn test_relayout_without_new_text_schedules_nothing() {
        let mut session = RevealSession::new(40, config());
        let mut obs = Recorder::default();
        session.push_delta("hello", &mut obs);
        session.push_delta("", &mut obs);
        assert_eq!(obs.added.len(), 1);
    }

    #[test]
    fn test_wrap_cancels_stale_reveals() {
        let mut session = RevealSession::new(16, config());
        let mut obs = Recorder::default();

        session.push_delta("The big gray ", &mut obs);
        session.push_delta("ele", &mut obs);
        let scheduled = obs.added.len();
        assert!(scheduled >= 2);

        // Mid-flight: nothing has finished animating yet.
        session.tick(ms(10), &mut obs);
        assert!(obs.removed.is_empty());

        // Completing the word wraps "elephant" to line 1 and relocates
        // the "ele" reveal; its in-flight animation is cancelled and the
        // new line is rescheduled from its start.
        session.push_delta("phant", &mut obs);
        session.tick(ms(1), &mut obs);

        let cancelled: Vec<_> = obs.removed.iter().filter(|&&(_, c)| c).collect();
        assert!(!cancelled.is_empty());

        // A reveal now exists for the wrapped line.
        let line1_rects: Vec<_> = session
            .driver()
            .active()
            .iter()
            .filter(|e| e.rect().line == 1)
            .collect();
        assert!(!line1_rects.is_empty());
    }

    #[test]
    fn test_completion_fires_after_finish_and_reveal() {
        let mut session = RevealSession::new(40, config());
        let mut obs = Recorder::default();

        session.push_delta("hi there", &mut obs);
        session.finish(&mut obs);
        session.tick(ms(100), &mut obs);

        assert_eq!(obs.completions, vec![8]);

        // Further ticks do not refire.
        session.tick(ms(100), &mut obs);
        assert_eq!(obs.completions, vec![8]);
    }

    #[test]
    fn test_tokenizer_holds_unsafe_chunks() {
        let mut session = RevealSession::new(40, SessionConfig {
            tokenizer: Some(TokenizerConfig::default()),
            ..config()
        });
        let mut obs = Recorder::default();

        session.push_delta("**bo", &mut obs);
        assert_eq!(session.text(), "");
        assert!(obs.added.is_empty());

        session.push_delta("ld**", &mut obs);
        assert_eq!(session.text(), "**bold**");
        assert_eq!(obs.added.len(), 1);
    }

    #[test]
    fn test_word_segmentation_staggered_batches() {
        let mut session = RevealSession::new(40, SessionConfig {
            reveal: RevealConfig {
                segmentation: Segmentation::Word,
                ..config().reveal
            },
            tokenizer: None,
        });
        let mut obs = Recorder::default();
        session.push_delta("one two", &mut obs);
        // "one", " ", "two"
        assert_eq!(obs.added.len(), 3);
    }
}
