use super::Vec2;

/// Axis-aligned rectangle (top-left origin, +Y down).
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

    /// Rectangle of `size` centered on `center`.
    #[inline]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::from_origin_size(center - size / 2.0, size)
    }

    /// Smallest rectangle containing every point. `None` for an empty slice.
    pub fn bounding(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (mut lo, mut hi) = (first, first);
        for p in &points[1..] {
            lo = Vec2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Vec2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Some(Self::from_origin_size(lo, hi - lo))
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    /// Corners in clockwise order starting at the top-left.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let (a, b) = (self.min(), self.max());
        [a, Vec2::new(b.x, a.y), b, Vec2::new(a.x, b.y)]
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.size.x < 0.0 {
            r.origin.x += r.size.x;
            r.size.x = -r.size.x;
        }
        if r.size.y < 0.0 {
            r.origin.y += r.size.y;
            r.size.y = -r.size.y;
        }
        r
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < r.max().x && p.y < r.max().y
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = a.max().x.min(b.max().x);
        let y1 = a.max().y.min(b.max().y);

        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── bounding ──────────────────────────────────────────────────────────

    #[test]
    fn bounding_of_scattered_points() {
        let pts = [Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0), Vec2::new(1.0, 1.0)];
        assert_eq!(Rect::bounding(&pts), Some(Rect::new(-2.0, -1.0, 5.0, 5.0)));
    }

    #[test]
    fn bounding_empty_is_none() {
        assert_eq!(Rect::bounding(&[]), None);
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersect(b).is_none());
    }

    #[test]
    fn from_center_round_trips_center() {
        let r = Rect::from_center(Vec2::new(50.0, 20.0), Vec2::new(10.0, 4.0));
        assert_eq!(r.origin, Vec2::new(45.0, 18.0));
        assert_eq!(r.center(), Vec2::new(50.0, 20.0));
    }
}
