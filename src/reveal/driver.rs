//! Reveal animation driver: staggered per-rectangle fade tasks.
//!
//! The driver owns the active-rectangle list and a job registry keyed by
//! rectangle identity. Each scheduled rectangle runs a small cooperative
//! task advanced by [`RevealDriver::advance`]:
//!
//! ```text
//! Pending(stagger) -> Animating(duration) -> Lingering(linger) -> removed
//! ```
//!
//! The three waits are the task's suspension points; cancellation is
//! observed at the next `advance` call and nowhere else. Cleanup (removal
//! from both the active list and the registry, plus the observer
//! notification) runs on every exit path, cancelled or completed.
//!
//! All mutation happens on whichever single context calls the driver; the
//! actor shell guarantees that is its dispatcher thread.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use super::calculator::{RectKey, RevealRect, Segmentation};
use super::easing::Easing;
use crate::geometry::Rect;

/// Configuration for the reveal driver.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    /// Delay added per position within a batch, producing the cascading
    /// left-to-right / top-to-bottom reveal.
    pub stagger: Duration,
    /// Duration of one rectangle's progress animation.
    pub duration: Duration,
    /// How long a fully revealed rectangle stays in the active set before
    /// removal.
    pub linger: Duration,
    /// Easing applied to raw time progress.
    pub easing: Easing,
    /// How computed ranges are split into rectangles.
    pub segmentation: Segmentation,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger: Duration::from_millis(40),
            duration: Duration::from_millis(350),
            linger: Duration::from_millis(120),
            easing: Easing::EaseOut,
            segmentation: Segmentation::Line,
        }
    }
}

/// Observer for reveal lifecycle events.
///
/// The host implements this to mirror the active set into its own drawing
/// state. All methods default to no-ops.
pub trait RevealObserver {
    /// A rectangle entered the active set.
    fn on_rect_added(&mut self, rect: &RevealRect) {
        let _ = rect;
    }

    /// A rectangle left the active set.
    ///
    /// `cancelled` is true when the task was cancelled rather than running
    /// to completion; cleanup has already happened in both cases.
    fn on_rect_removed(&mut self, key: RectKey, cancelled: bool) {
        let _ = (key, cancelled);
    }

    /// Every rectangle up to `text_len` characters has finished revealing.
    ///
    /// Fires once per distinct text length.
    fn on_complete(&mut self, text_len: usize) {
        let _ = text_len;
    }
}

/// The no-op observer.
impl RevealObserver for () {}

/// Task phase of an active rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting out the stagger delay.
    Pending { remaining: Duration },
    /// Progress animation running.
    Animating { elapsed: Duration },
    /// Fully revealed, waiting out the linger delay.
    Lingering { remaining: Duration },
}

/// A rectangle plus its animation state.
#[derive(Debug, Clone)]
pub struct ActiveRect {
    rect: RevealRect,
    key: RectKey,
    phase: Phase,
    progress: f32,
    cancelled: bool,
    done: bool,
}

impl ActiveRect {
    /// The underlying rectangle.
    pub const fn rect(&self) -> &RevealRect {
        &self.rect
    }

    /// Identity key.
    pub const fn key(&self) -> RectKey {
        self.key
    }

    /// Raw animation progress in `[0, 1]`.
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the reveal animation has finished (the entry may still be
    /// lingering in the active set).
    pub fn is_revealed(&self) -> bool {
        self.progress >= 1.0
    }
}

/// A drawable snapshot of one active rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSnapshot {
    /// Rectangle geometry.
    pub rect: Rect,
    /// First covered character offset (inclusive).
    pub start: usize,
    /// Last covered character offset (inclusive).
    pub end: usize,
    /// Source line index.
    pub line: usize,
    /// Eased progress, usable directly as opacity.
    pub progress: f32,
}

/// Drives the reveal animations for a growing text.
#[derive(Debug)]
pub struct RevealDriver {
    config: RevealConfig,
    /// Active entries in schedule order.
    entries: Vec<ActiveRect>,
    /// Job registry: one live task per identity key.
    jobs: HashMap<RectKey, ()>,
    /// Keys whose reveal ran to completion; never re-scheduled.
    finished: HashSet<RectKey>,
    /// Current known text length.
    text_len: usize,
    /// Text length the completion callback last fired for.
    completed_len: Option<usize>,
}

impl RevealDriver {
    /// Create a driver with the given configuration.
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            jobs: HashMap::new(),
            finished: HashSet::new(),
            text_len: 0,
            completed_len: None,
        }
    }

    /// The driver's configuration.
    pub const fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// The active entries, in schedule order.
    pub fn active(&self) -> &[ActiveRect] {
        &self.entries
    }

    /// Whether no tasks remain in the active set.
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inform the driver of the current text length.
    ///
    /// Completion fires only for the length current at quiescence, so
    /// transient intermediate lengths never produce a callback.
    pub fn set_text_len(&mut self, len: usize) {
        self.text_len = len;
    }

    /// Schedule a batch of rectangles.
    ///
    /// Idempotent by identity key: rectangles already live in the registry
    /// or already fully revealed in the past are skipped, so a batch may
    /// be re-delivered on every re-layout without duplicating animations.
    /// The stagger delay grows with the rectangle's position in the batch.
    pub fn schedule_batch(&mut self, batch: &[RevealRect], observer: &mut dyn RevealObserver) {
        for (index, rect) in batch.iter().enumerate() {
            let key = rect.key();
            if self.jobs.contains_key(&key) || self.finished.contains(&key) {
                continue;
            }
            let position = u32::try_from(index).unwrap_or(u32::MAX);
            let remaining = self.config.stagger.saturating_mul(position);
            self.entries.push(ActiveRect {
                rect: *rect,
                key,
                phase: Phase::Pending { remaining },
                progress: 0.0,
                cancelled: false,
                done: false,
            });
            self.jobs.insert(key, ());
            observer.on_rect_added(rect);
        }
    }

    /// Request cancellation of the task for `key`.
    ///
    /// Cooperative: the task observes the request at its next suspension
    /// point (the following [`advance`](Self::advance)) and runs its
    /// cleanup there. Returns whether a live task was found.
    pub fn cancel(&mut self, key: RectKey) -> bool {
        if !self.jobs.contains_key(&key) {
            return false;
        }
        for entry in &mut self.entries {
            if entry.key == key {
                entry.cancelled = true;
                return true;
            }
        }
        false
    }

    /// Cancel still-animating entries relocated off a stale line.
    ///
    /// Targets entries on `stale_line` whose character range reaches
    /// `restart_from` or beyond — the text that wrapped away. Entries
    /// before the restart offset kept their position, and fully revealed
    /// entries are left to linger out; neither would draw at stale
    /// coordinates. Returns the number of cancellations requested.
    pub fn cancel_relocated(&mut self, stale_line: usize, restart_from: usize) -> usize {
        let mut cancelled = 0;
        for entry in &mut self.entries {
            if entry.rect.line == stale_line
                && entry.rect.end >= restart_from
                && entry.progress < 1.0
                && !entry.cancelled
            {
                entry.cancelled = true;
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            log::trace!(
                "cancelled {cancelled} in-flight reveals relocated off line {stale_line}"
            );
        }
        cancelled
    }

    /// Advance every task by `dt`.
    ///
    /// Cancelled tasks are cleaned up first; remaining tasks move through
    /// their phases. Completion is evaluated after the pass.
    pub fn advance(&mut self, dt: Duration, observer: &mut dyn RevealObserver) {
        let duration = self.config.duration;
        let linger = self.config.linger;

        for entry in &mut self.entries {
            if entry.cancelled {
                continue;
            }
            let mut budget = dt;
            loop {
                match entry.phase {
                    Phase::Pending { remaining } => {
                        if budget < remaining {
                            entry.phase = Phase::Pending { remaining: remaining - budget };
                            break;
                        }
                        budget -= remaining;
                        entry.phase = Phase::Animating { elapsed: Duration::ZERO };
                    }
                    Phase::Animating { elapsed } => {
                        let elapsed = elapsed + budget;
                        if duration.is_zero() || elapsed >= duration {
                            entry.progress = 1.0;
                            self.finished.insert(entry.key);
                            entry.phase = Phase::Lingering { remaining: linger };
                            // Overshoot past the animation end is absorbed;
                            // the linger clock starts at this advance.
                            break;
                        }
                        entry.progress = elapsed.as_secs_f32() / duration.as_secs_f32();
                        entry.phase = Phase::Animating { elapsed };
                        break;
                    }
                    Phase::Lingering { remaining } => {
                        if budget < remaining {
                            entry.phase = Phase::Lingering { remaining: remaining - budget };
                        } else {
                            entry.done = true;
                        }
                        break;
                    }
                }
            }
        }

        self.sweep(observer);
        self.maybe_fire_completion(observer);
    }

    /// Remove finished and cancelled entries, running cleanup for each.
    fn sweep(&mut self, observer: &mut dyn RevealObserver) {
        if !self.entries.iter().any(|e| e.done || e.cancelled) {
            return;
        }
        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if entry.done || entry.cancelled {
                removed.push((entry.key, entry.cancelled));
                false
            } else {
                true
            }
        });
        for (key, cancelled) in removed {
            // Cleanup runs identically for both exit paths.
            self.jobs.remove(&key);
            if cancelled {
                log::trace!("reveal task for {key:?} cancelled");
            }
            observer.on_rect_removed(key, cancelled);
        }
    }

    fn maybe_fire_completion(&mut self, observer: &mut dyn RevealObserver) {
        if self.text_len == 0 || self.completed_len == Some(self.text_len) {
            return;
        }
        if self.entries.iter().all(ActiveRect::is_revealed) {
            self.completed_len = Some(self.text_len);
            log::debug!("reveal complete at text length {}", self.text_len);
            observer.on_complete(self.text_len);
        }
    }

    /// Drawable snapshots of the active set, with eased progress.
    pub fn snapshot(&self) -> Vec<RectSnapshot> {
        self.entries
            .iter()
            .map(|entry| RectSnapshot {
                rect: entry.rect.rect,
                start: entry.rect.start,
                end: entry.rect.end,
                line: entry.rect.line,
                progress: self.config.easing.apply(entry.progress),
            })
            .collect()
    }

    /// Drop all tasks and history without notification.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.jobs.clear();
        self.finished.clear();
        self.text_len = 0;
        self.completed_len = None;
    }
}
