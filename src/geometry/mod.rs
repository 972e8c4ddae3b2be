//! Geometry primitives for reveal calculations.

mod rect;

pub use rect::Rect;
