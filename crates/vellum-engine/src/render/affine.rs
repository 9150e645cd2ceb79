use crate::coords::{Rect, Vec2};

/// 2D affine transform in canvas layout:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
///
/// `translate`/`rotate`/`scale` concatenate on the local side, so the most
/// recently applied operation acts first on drawn points (save/restore
/// semantics of a retained graphics context).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Affine { e: tx, f: ty, ..Self::IDENTITY }
    }

    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Affine { a: c, b: s, c: -s, d: c, e: 0.0, f: 0.0 }
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Affine { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// `self * local`: `local` is applied to points first.
    #[inline]
    pub fn then_local(self, m: Affine) -> Affine {
        Affine {
            a: self.a * m.a + self.c * m.b,
            b: self.b * m.a + self.d * m.b,
            c: self.a * m.c + self.c * m.d,
            d: self.b * m.c + self.d * m.d,
            e: self.a * m.e + self.c * m.f + self.e,
            f: self.b * m.e + self.d * m.f + self.f,
        }
    }

    #[inline]
    pub fn translate(self, tx: f32, ty: f32) -> Affine {
        self.then_local(Affine::translation(tx, ty))
    }

    #[inline]
    pub fn rotate(self, radians: f32) -> Affine {
        self.then_local(Affine::rotation(radians))
    }

    #[inline]
    pub fn scale(self, sx: f32, sy: f32) -> Affine {
        self.then_local(Affine::scaling(sx, sy))
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    /// Axis-aligned bounds of a transformed rectangle.
    pub fn apply_rect_bounds(&self, r: Rect) -> Rect {
        let corners = r.corners().map(|p| self.apply(p));
        Rect::bounding(&corners).unwrap_or(r)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn translate_then_rotate_rotates_about_translated_origin() {
        let t = Affine::IDENTITY.translate(10.0, 0.0).rotate(core::f32::consts::FRAC_PI_2);
        let p = t.apply(Vec2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn scale_then_translate_scales_offset() {
        let t = Affine::IDENTITY.scale(2.0, 3.0).translate(1.0, 1.0);
        assert_eq!(t.apply(Vec2::ZERO), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn rect_bounds_of_rotated_square() {
        let t = Affine::rotation(core::f32::consts::FRAC_PI_4);
        let b = t.apply_rect_bounds(Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_relative_eq!(b.size.x, 2.0 * 2f32.sqrt(), epsilon = 1e-5);
    }
}
