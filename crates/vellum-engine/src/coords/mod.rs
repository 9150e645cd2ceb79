//! Coordinate and geometry types shared across the scene, camera and renderer.
//!
//! Canonical CPU space:
//! - Reference pixels (the design-time canvas, see [`ResolutionMapper`])
//! - Origin top-left
//! - +X right, +Y down
//!
//! Physics space (meters) is only ever seen inside `physics::bridge`.

mod mapper;
mod rect;
mod vec2;
mod viewport;

pub use mapper::ResolutionMapper;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
