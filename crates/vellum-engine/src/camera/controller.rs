use crate::coords::{Vec2, Viewport};
use crate::scene::EntityId;

/// Smallest zoom the camera accepts; screen/world conversion divides by zoom.
pub const MIN_ZOOM: f32 = 1e-3;

/// Tunables applied when the camera is created.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per tick, per axis.
    pub tween: (f32, f32, f32),
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom change per wheel line when zoom-follow is enabled.
    pub zoom_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { tween: (0.1, 0.1, 0.1), min_zoom: 0.25, max_zoom: 4.0, zoom_sensitivity: 0.1 }
    }
}

/// Scroll/zoom controller.
///
/// Follow is a one-sided exponential approach: each tick moves a fixed
/// fraction of the remaining distance, so it never overshoots. Bounds are
/// applied after tweening.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    follow: Option<EntityId>,
    zoom_follow: bool,

    position: Vec2,
    zoom: f32,
    target_zoom: f32,

    /// Pan bounds as `(min, max)` world corners.
    bounds: Option<(Vec2, Vec2)>,
    min_zoom: f32,
    max_zoom: f32,

    tween_x: f32,
    tween_y: f32,
    tween_z: f32,
    zoom_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let (tween_x, tween_y, tween_z) = config.tween;
        Self {
            follow: None,
            zoom_follow: false,
            position: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
            bounds: None,
            min_zoom: config.min_zoom.max(MIN_ZOOM),
            max_zoom: config.max_zoom.max(config.min_zoom.max(MIN_ZOOM)),
            tween_x: tween_x.clamp(0.0, 1.0),
            tween_y: tween_y.clamp(0.0, 1.0),
            tween_z: tween_z.clamp(0.0, 1.0),
            zoom_sensitivity: config.zoom_sensitivity,
        }
    }

    /// Follows `target` inside the world rectangle `[min, max]`.
    pub fn adjust_camera(&mut self, target: Option<EntityId>, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        self.follow = target;
        self.bounds = Some((Vec2::new(min_x, min_y), Vec2::new(max_x, max_y)));
        log::debug!("camera: follow {target:?} within ({min_x}, {min_y})..({max_x}, {max_y})");
    }

    pub fn follow(&mut self, target: Option<EntityId>) {
        self.follow = target;
    }

    #[inline]
    pub fn target(&self) -> Option<EntityId> {
        self.follow
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Sets the zoom range. A `min_zoom` below [`MIN_ZOOM`] (or not finite)
    /// is refused with a warning and the current range is kept.
    pub fn set_zoom_bounds(&mut self, min_zoom: f32, max_zoom: f32) {
        if !(min_zoom.is_finite() && min_zoom >= MIN_ZOOM) {
            log::warn!("camera: ignoring zoom bounds {min_zoom}..{max_zoom}; minimum must be at least {MIN_ZOOM}");
            return;
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.clamp_zoom(self.zoom);
        self.target_zoom = self.clamp_zoom(self.target_zoom);
    }

    pub fn set_tween(&mut self, x: f32, y: f32, z: f32) {
        self.tween_x = x.clamp(0.0, 1.0);
        self.tween_y = y.clamp(0.0, 1.0);
        self.tween_z = z.clamp(0.0, 1.0);
    }

    /// Lets wheel input drive the zoom target.
    pub fn enable_zoom_follow(&mut self, enabled: bool) {
        self.zoom_follow = enabled;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Sets zoom immediately, bypassing the tween.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = self.clamp_zoom(zoom);
        self.target_zoom = self.zoom;
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Advances the camera by one tick.
    ///
    /// `target` is the followed entity's position (if any) and `wheel` the
    /// vertical wheel movement in lines since the previous tick.
    pub fn tick(&mut self, viewport: Viewport, target: Option<Vec2>, wheel: f32) {
        if self.zoom_follow {
            self.target_zoom = self.clamp_zoom(self.target_zoom + wheel * self.zoom_sensitivity);
            self.zoom += (self.target_zoom - self.zoom) * self.tween_z;
        }
        self.zoom = self.clamp_zoom(self.zoom);

        let visible = viewport.size() / self.zoom;
        if let Some(t) = target {
            let desired = t - visible / 2.0;
            self.position.x += (desired.x - self.position.x) * self.tween_x;
            self.position.y += (desired.y - self.position.y) * self.tween_y;
        }

        if let Some((min, max)) = self.bounds {
            self.position.x = clamp_axis(self.position.x, min.x, max.x - visible.x);
            self.position.y = clamp_axis(self.position.y, min.y, max.y - visible.y);
        }
        log::trace!("camera: pos {:?} zoom {}", self.position, self.zoom);
    }

    /// Reference-pixel screen point to world coordinates.
    #[inline]
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p / self.zoom + self.position
    }

    #[inline]
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.position) * self.zoom
    }

    fn clamp_zoom(&self, z: f32) -> f32 {
        if z.is_finite() { clamp_axis(z, self.min_zoom, self.max_zoom) } else { self.min_zoom }
    }
}

/// Clamps into `[lo, hi]`, pinning to `lo` when the world is smaller than
/// the view.
#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo { lo } else { v.max(lo).min(hi) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn clamp_holds_against_overshooting_target() {
        let mut cam = Camera::default();
        cam.set_tween(0.9, 0.9, 0.1);
        cam.adjust_camera(Some(EntityId::next()), 0.0, 0.0, 1000.0, 1000.0);

        let targets = [5000.0, -3000.0, 400.0, 999.0, -1.0, 1e6];
        for i in 0..200 {
            let t = targets[i % targets.len()];
            cam.tick(VIEW, Some(Vec2::new(t, t)), 0.0);
            assert!((0.0..=200.0).contains(&cam.position().x), "x = {}", cam.position().x);
        }
    }

    #[test]
    fn follow_approaches_without_overshoot() {
        let mut cam = Camera::default();
        cam.set_tween(0.5, 0.5, 0.5);
        let target = Vec2::new(1400.0, 300.0);
        let mut prev = cam.position().x;
        for _ in 0..40 {
            cam.tick(VIEW, Some(target), 0.0);
            assert!(cam.position().x >= prev);
            assert!(cam.position().x <= 1000.0);
            prev = cam.position().x;
        }
        assert_relative_eq!(cam.position().x, 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn zoom_bounds_apply_to_zoom() {
        let mut cam = Camera::default();
        cam.set_zoom(3.0);
        cam.set_zoom_bounds(0.5, 2.0);
        assert_eq!(cam.zoom(), 2.0);
        assert_eq!(cam.position(), Vec2::ZERO);
    }

    #[test]
    fn non_positive_zoom_bounds_are_refused() {
        let mut cam = Camera::default();
        cam.set_zoom_bounds(0.0, 2.0);
        cam.set_zoom_bounds(-1.0, 2.0);
        cam.set_zoom(0.0);
        assert_eq!(cam.zoom(), 0.25);

        let mut tiny = Camera::new(CameraConfig { min_zoom: 0.0, ..CameraConfig::default() });
        tiny.set_zoom(0.0);
        assert_eq!(tiny.zoom(), MIN_ZOOM);
        assert!(tiny.screen_to_world(Vec2::new(10.0, 10.0)).is_finite());
    }

    #[test]
    fn wheel_drives_zoom_when_following() {
        let mut cam = Camera::default();
        cam.set_tween(1.0, 1.0, 1.0);
        cam.tick(VIEW, None, 5.0);
        assert_eq!(cam.zoom(), 1.0);

        cam.enable_zoom_follow(true);
        cam.tick(VIEW, None, 5.0);
        assert_relative_eq!(cam.zoom(), 1.5, epsilon = 1e-5);
    }

    #[test]
    fn world_smaller_than_view_pins_to_min() {
        let mut cam = Camera::default();
        cam.adjust_camera(None, 10.0, 10.0, 100.0, 100.0);
        cam.set_position(Vec2::new(50.0, 50.0));
        cam.tick(VIEW, None, 0.0);
        assert_eq!(cam.position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn screen_world_round_trip() {
        let mut cam = Camera::default();
        cam.set_zoom(2.0);
        cam.set_position(Vec2::new(100.0, 50.0));
        let w = cam.screen_to_world(Vec2::new(200.0, 100.0));
        assert_eq!(w, Vec2::new(200.0, 100.0));
        assert_eq!(cam.world_to_screen(w), Vec2::new(200.0, 100.0));
    }
}
