//! Paint model shared between renderers and the graphics state stacks.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - composite rule (blend mode + opacity)
//! - stroke style
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod composite;
pub mod stroke;

pub use color::Color;
pub use composite::{BlendMode, Composite};
pub use stroke::{LineCap, LineJoin, Stroke};
