use super::{Rect, Vec2, Viewport};

/// Maps reference-resolution coordinates onto the actual framebuffer.
///
/// Content is authored once against `reference`; every coordinate is scaled
/// independently per axis: `actual = value / reference_dim * actual_dim`.
/// Non-uniform aspect ratios therefore stretch rather than letterbox.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolutionMapper {
    reference: Viewport,
    actual: Viewport,
}

impl ResolutionMapper {
    /// Creates a mapper. Invalid (zero, negative, non-finite) resolutions are
    /// replaced by the other side so mapping degrades to identity instead of
    /// producing NaN.
    pub fn new(reference: Viewport, actual: Viewport) -> Self {
        let reference = if reference.is_valid() { reference } else { actual };
        let actual = if actual.is_valid() { actual } else { reference };
        Self { reference, actual }
    }

    /// Identity mapping for a single resolution.
    pub fn identity(resolution: Viewport) -> Self {
        Self::new(resolution, resolution)
    }

    #[inline]
    pub fn reference(&self) -> Viewport {
        self.reference
    }

    #[inline]
    pub fn actual(&self) -> Viewport {
        self.actual
    }

    #[inline]
    pub fn scale_x(&self) -> f32 {
        self.actual.width / self.reference.width
    }

    #[inline]
    pub fn scale_y(&self) -> f32 {
        self.actual.height / self.reference.height
    }

    #[inline]
    pub fn map_x(&self, x: f32) -> f32 {
        x / self.reference.width * self.actual.width
    }

    #[inline]
    pub fn map_y(&self, y: f32) -> f32 {
        y / self.reference.height * self.actual.height
    }

    #[inline]
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.map_x(p.x), self.map_y(p.y))
    }

    #[inline]
    pub fn map_rect(&self, r: Rect) -> Rect {
        Rect::from_origin_size(self.map_point(r.origin), self.map_point(r.size))
    }

    /// Scales a length that has no axis (stroke widths, radii of round caps).
    ///
    /// Uses the mean of both axis scales.
    #[inline]
    pub fn map_len(&self, len: f32) -> f32 {
        len * (self.scale_x() + self.scale_y()) * 0.5
    }

    /// Inverse mapping: actual framebuffer pixels back to reference space.
    #[inline]
    pub fn unmap_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x / self.actual.width * self.reference.width,
            p.y / self.actual.height * self.reference.height,
        )
    }
}
