//! Rect: An axis-aligned rectangle in layout-local coordinates.

/// An axis-aligned rectangle defined by its edges.
///
/// Coordinates are layout-local floats: `x` grows rightward, `y` grows
/// downward. Rectangles are produced fresh on each layout pass and never
/// mutated in place.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Create a new rectangle from its edges.
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Zero-sized rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Width of the rectangle. Negative when the edges are inverted.
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle. Negative when the edges are inverted.
    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Check whether the rectangle has non-positive width or height.
    ///
    /// Degenerate rectangles are filtered out of all reveal output.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Check if this rectangle overlaps another.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Copy of this rectangle with the vertical extent replaced.
    ///
    /// Used to snap a character box to its line's top/bottom, which avoids
    /// jitter at sub-pixel glyph boundaries.
    #[must_use]
    pub fn with_vertical(&self, top: f32, bottom: f32) -> Self {
        Self { left: self.left, top, right: self.right, bottom }
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {} -> {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(1.0, 2.0, 4.0, 8.0);
        assert_eq!(r.width(), 3.0);
        assert_eq!(r.height(), 6.0);
        assert!(!r.is_degenerate());
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::ZERO.is_degenerate());
        assert!(Rect::new(0.0, 0.0, 5.0, 0.0).is_degenerate());
        assert!(Rect::new(5.0, 0.0, 0.0, 5.0).is_degenerate());
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 2.0, 1.0);
        let b = Rect::new(1.0, 0.5, 4.0, 3.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 4.0, 3.0));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(1.0, 1.0, 3.0, 3.0);
        let c = Rect::new(2.0, 0.0, 4.0, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_vertical_snap() {
        let r = Rect::new(1.0, 0.2, 2.0, 0.9).with_vertical(0.0, 1.0);
        assert_eq!(r, Rect::new(1.0, 0.0, 2.0, 1.0));
    }
}
