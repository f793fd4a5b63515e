use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The 1x1 rectangle under a pointer position. Coordinates are truncated
    /// toward zero.
    pub fn pointer(x: f32, y: f32) -> Self {
        Self::new(x as i32, y as i32, 1, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when the rectangles share at least one pixel. Rectangles that
    /// only touch along an edge do not intersect; empty rectangles never do.
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Pointer-over test: does the 1x1 pointer rectangle at `(x, y)` intersect `self`?
    pub fn contains_pointer(&self, x: f32, y: f32) -> bool {
        Self::pointer(x, y).intersects(self)
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ScreenRect = ScreenRect::new(0, 0, 1520, 830);

    #[test]
    fn pointer_inside_viewport() {
        assert!(VIEWPORT.contains_pointer(10.0, 10.0));
        assert!(VIEWPORT.contains_pointer(0.0, 0.0));
        assert!(VIEWPORT.contains_pointer(1519.0, 829.0));
    }

    #[test]
    fn pointer_on_far_edges_does_not_intersect() {
        assert!(!VIEWPORT.contains_pointer(1520.0, 10.0));
        assert!(!VIEWPORT.contains_pointer(10.0, 830.0));
        assert!(!VIEWPORT.contains_pointer(-1.0, 10.0));
        assert!(!VIEWPORT.contains_pointer(10.0, -1.0));
    }

    #[test]
    fn fractional_pointer_truncates() {
        assert!(VIEWPORT.contains_pointer(1519.9, 829.9));
        // -0.5 truncates to 0, which is still inside.
        assert!(VIEWPORT.contains_pointer(-0.5, 0.0));
    }

    #[test]
    fn pointer_over_panels_is_outside() {
        // Properties panel column and console strip.
        assert!(!VIEWPORT.contains_pointer(1700.0, 100.0));
        assert!(!VIEWPORT.contains_pointer(200.0, 1000.0));
    }

    #[test]
    fn empty_rects_never_intersect() {
        let empty = ScreenRect::new(0, 0, 0, 10);
        assert!(!empty.intersects(&VIEWPORT));
        assert!(!VIEWPORT.intersects(&empty));
    }

    #[test]
    fn overlapping_rects_intersect() {
        let a = ScreenRect::new(0, 0, 10, 10);
        let b = ScreenRect::new(9, 9, 10, 10);
        let c = ScreenRect::new(10, 0, 10, 10);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(ScreenRect::new(0, 0, 100, 0).aspect(), 100.0);
        assert!((VIEWPORT.aspect() - 1520.0 / 830.0).abs() < 1e-6);
    }
}
