//! Resolution-independent drawing.
//!
//! Callers draw through [`Graphics`] in reference pixels. Every primitive is
//! mapped onto the actual framebuffer and recorded into a [`DrawList`] together
//! with the transform, clip, composite, stroke and color in effect. A
//! [`Surface`] receives the finished list once per frame.
//!
//! Convention:
//! - reference and actual pixels share the top-left origin, +Y down
//! - the recorded list is in paint order (back-to-front)

mod affine;
mod cmd;
mod graphics;
mod list;
mod state;
mod surface;

pub mod renderers;
pub mod shapes;

pub use affine::Affine;
pub use cmd::DrawCmd;
pub use graphics::Graphics;
pub use list::{DrawItem, DrawList};
pub use state::{GraphicsState, StateStack};
pub use surface::{HeadlessSurface, Surface, SurfaceHandle};
