use crate::coords::Vec2;
use crate::core::EngineError;

/// Per-world physics constants.
///
/// Each `PhysicsBridge` owns its own copy, so scenes never share mutable
/// simulation settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity in m/s² (+Y down, matching screen space).
    pub gravity: Vec2,
    /// Pixels per meter at the render/physics boundary.
    pub pixels_per_meter: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 10.0),
            pixels_per_meter: 32.0,
            velocity_iterations: 8,
            position_iterations: 3,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.pixels_per_meter.is_finite() && self.pixels_per_meter > 0.0) {
            return Err(EngineError::config(format!(
                "pixels_per_meter must be positive, got {}",
                self.pixels_per_meter
            )));
        }
        if !self.gravity.is_finite() {
            return Err(EngineError::config("gravity must be finite"));
        }
        if self.velocity_iterations == 0 {
            return Err(EngineError::config("velocity_iterations must be at least 1"));
        }
        Ok(())
    }

    /// Pixels -> meters.
    #[inline]
    pub fn to_meters(&self, px: f32) -> f32 {
        px / self.pixels_per_meter
    }

    /// Meters -> pixels.
    #[inline]
    pub fn to_pixels(&self, m: f32) -> f32 {
        m * self.pixels_per_meter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        PhysicsConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_ppm() {
        let cfg = PhysicsConfig { pixels_per_meter: 0.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn conversion_is_symmetric() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.to_meters(64.0), 2.0);
        assert_eq!(cfg.to_pixels(cfg.to_meters(17.0)), 17.0);
    }
}
