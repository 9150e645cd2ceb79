//! Primitive draw commands, one module per shape.
//!
//! Each module owns its command payload and the `Graphics` helpers that map
//! reference-pixel arguments and record it.

pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod oval;
pub(crate) mod polygon;
pub(crate) mod rect;
pub(crate) mod text;

pub use image::ImageCmd;
pub use line::LineCmd;
pub use oval::OvalCmd;
pub use polygon::PolygonCmd;
pub use rect::RectCmd;
pub use text::TextCmd;
