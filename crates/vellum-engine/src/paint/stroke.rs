#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Outline style for unfilled primitives and lines.
///
/// `width` is in reference pixels; it is scaled to the framebuffer when a
/// primitive is recorded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Stroke {
    #[inline]
    pub fn new(width: f32) -> Self {
        Self { width: width.max(0.0), ..Self::default() }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self { width: 1.0, cap: LineCap::Butt, join: LineJoin::Miter }
    }
}
