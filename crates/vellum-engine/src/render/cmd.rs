use crate::paint::Color;
use crate::render::shapes::image::ImageCmd;
use crate::render::shapes::line::LineCmd;
use crate::render::shapes::oval::OvalCmd;
use crate::render::shapes::polygon::PolygonCmd;
use crate::render::shapes::rect::RectCmd;
use crate::render::shapes::text::TextCmd;

/// Backend-agnostic draw command stream.
///
/// Geometry is in actual framebuffer pixels, before the item's transform.
///
/// Extending the command set:
/// - add a new shape module under `render::shapes::*`
/// - add a new variant here
/// - implement the `Graphics` helpers inside that shape module
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Rect(RectCmd),
    Oval(OvalCmd),
    Line(LineCmd),
    Polygon(PolygonCmd),
    Image(ImageCmd),
    Text(TextCmd),
}

impl DrawCmd {
    /// Short label used in trace logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCmd::Clear(_) => "clear",
            DrawCmd::Rect(_) => "rect",
            DrawCmd::Oval(_) => "oval",
            DrawCmd::Line(_) => "line",
            DrawCmd::Polygon(_) => "polygon",
            DrawCmd::Image(_) => "image",
            DrawCmd::Text(_) => "text",
        }
    }
}
