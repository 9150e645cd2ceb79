//! Tween-follow camera.
//!
//! The camera produces a scroll offset and a zoom factor in reference
//! pixels. It is ticked once per simulation tick by the loop and read by the
//! scene when rendering dynamic entities.

mod controller;

pub use controller::{Camera, CameraConfig, MIN_ZOOM};
