use crate::camera::Camera;
use crate::coords::Viewport;
use crate::input::InputSnapshot;
use crate::lighting::AmbientLight;

use super::{DebugFlags, EngineConfig};

/// Engine-wide state shared with scenes, scripts and renderers.
///
/// Owned by the loop core and passed down by reference each tick and frame.
#[derive(Debug, Clone)]
pub struct EngineContext {
    /// Input committed at the start of the current tick.
    pub input: InputSnapshot,
    pub camera: Camera,
    pub ambient: AmbientLight,
    pub debug: DebugFlags,

    reference: Viewport,
    ticks_per_second: u32,
    tick: u64,
    stop_requested: bool,
}

impl EngineContext {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            input: InputSnapshot::default(),
            camera: Camera::new(config.camera),
            ambient: AmbientLight::new(),
            debug: config.debug,
            reference: config.reference,
            ticks_per_second: config.ticks_per_second,
            tick: 0,
            stop_requested: false,
        }
    }

    /// Number of ticks started so far.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    #[inline]
    pub fn reference(&self) -> Viewport {
        self.reference
    }

    /// Asks the loop to stop after the current tick.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub(crate) fn begin_tick(&mut self, input: InputSnapshot) {
        self.input = input;
        self.tick += 1;
    }

    pub(crate) fn clear_stop(&mut self) {
        self.stop_requested = false;
    }
}
