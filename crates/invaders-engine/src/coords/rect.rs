use super::Vec2;

/// Axis-aligned rectangle in play-field pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// Strict AABB overlap test. Rects that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        a0.x < b1.x && a1.x > b0.x && a0.y < b1.y && a1.y > b0.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── overlaps ──────────────────────────────────────────────────────────

    #[test]
    fn overlaps_partial() {
        assert!(r(0.0, 0.0, 10.0, 10.0).overlaps(r(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn overlaps_contained() {
        assert!(r(0.0, 0.0, 100.0, 100.0).overlaps(r(10.0, 10.0, 4.0, 10.0)));
        assert!(r(10.0, 10.0, 4.0, 10.0).overlaps(r(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn touching_edge_does_not_overlap() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).overlaps(r(10.0, 0.0, 10.0, 10.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).overlaps(r(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn disjoint_does_not_overlap() {
        assert!(!r(0.0, 0.0, 5.0, 5.0).overlaps(r(20.0, 20.0, 5.0, 5.0)));
    }
}
