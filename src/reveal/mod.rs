//! Reveal pipeline: rect calculation, reflow reconciliation, animation.

pub mod calculator;
mod driver;
mod easing;
mod reconciler;

pub use calculator::{rects_for_range, RectKey, RevealRect, Segmentation};
pub use driver::{ActiveRect, RectSnapshot, RevealConfig, RevealDriver, RevealObserver};
pub use easing::Easing;
pub use reconciler::{ReflowDecision, ReflowReconciler};
