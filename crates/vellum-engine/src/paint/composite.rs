/// Porter-Duff / blend rule applied when a primitive is drawn.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    #[default]
    SourceOver,
    Source,
    Additive,
    Multiply,
}

/// Composite state: blend rule plus a global opacity multiplier.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Composite {
    pub mode: BlendMode,
    /// Opacity in `[0, 1]`, applied on top of the draw color's alpha.
    pub alpha: f32,
}

impl Composite {
    pub const OPAQUE: Composite = Composite { mode: BlendMode::SourceOver, alpha: 1.0 };

    #[inline]
    pub fn new(mode: BlendMode, alpha: f32) -> Self {
        Self { mode, alpha: alpha.clamp(0.0, 1.0) }
    }

    #[inline]
    pub fn with_alpha(alpha: f32) -> Self {
        Self::new(BlendMode::SourceOver, alpha)
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::OPAQUE
    }
}
