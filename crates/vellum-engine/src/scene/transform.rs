use crate::coords::Vec2;

/// Entity pose in reference pixels. Rotation is in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec2::ZERO, rotation: 0.0, scale: Vec2::ONE }
    }
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}
