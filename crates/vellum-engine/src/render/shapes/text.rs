use crate::assets::FontHandle;
use crate::coords::Vec2;
use crate::render::{DrawCmd, Graphics};

/// Text run; shaping and rasterization belong to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontHandle,
    /// Font size in actual pixels (scaled by the vertical axis).
    pub size: f32,
    /// Baseline origin in actual pixels.
    pub origin: Vec2,
}

impl Graphics {
    pub fn draw_text(&mut self, text: impl Into<String>, font: &FontHandle, size: f32, origin: Vec2) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let origin = self.map_point(origin);
        let size = self.mapper().map_y(size);
        self.record(DrawCmd::Text(TextCmd { text, font: font.clone(), size, origin }));
    }
}
