use crate::camera::CameraConfig;
use crate::coords::Viewport;
use crate::paint::Color;
use crate::physics::PhysicsConfig;

use super::EngineError;

/// Optional debug overlays.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DebugFlags {
    /// World X/Y axes through the origin.
    pub axes: bool,
    /// Collider outlines (green solid, yellow trigger).
    pub colliders: bool,
    pub scripts: bool,
    pub renderers: bool,
}

impl DebugFlags {
    pub const fn all() -> Self {
        Self { axes: true, colliders: true, scripts: true, renderers: true }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.axes || self.colliders || self.scripts || self.renderers
    }
}

/// Engine configuration, validated once when a [`LoopCore`](super::LoopCore)
/// is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub ticks_per_second: u32,
    /// Design-time canvas all content is authored against.
    pub reference: Viewport,
    pub background: Color,
    /// Frame pacing cap. `None` renders as fast as the loop spins.
    pub max_fps: Option<u32>,
    pub debug: DebugFlags,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            reference: Viewport::new(1920.0, 1080.0),
            background: Color::BLACK,
            max_fps: None,
            debug: DebugFlags::default(),
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.ticks_per_second == 0 {
            return Err(EngineError::config("ticks_per_second must be at least 1"));
        }
        if !self.reference.is_valid() {
            return Err(EngineError::config(format!(
                "reference resolution {}x{} is not drawable",
                self.reference.width, self.reference.height
            )));
        }
        if self.max_fps == Some(0) {
            return Err(EngineError::config("max_fps must be at least 1 when set"));
        }
        let cam = &self.camera;
        if !(cam.min_zoom > 0.0 && cam.min_zoom <= cam.max_zoom) {
            return Err(EngineError::config(format!(
                "camera zoom bounds {}..{} are invalid",
                cam.min_zoom, cam.max_zoom
            )));
        }
        self.physics.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let cfg = EngineConfig { ticks_per_second: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn physics_errors_surface() {
        let mut cfg = EngineConfig::default();
        cfg.physics.pixels_per_meter = -1.0;
        assert!(cfg.validate().is_err());
    }
}
