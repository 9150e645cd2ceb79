use crate::assets::FontHandle;
use crate::coords::Vec2;
use crate::core::EngineContext;
use crate::paint::Color;
use crate::render::Graphics;
use crate::scene::{Renderer, Transform};

/// Single line of text with its baseline at `offset` from the entity origin.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub text: String,
    pub font: FontHandle,
    pub size: f32,
    pub color: Color,
    pub offset: Vec2,
}

impl TextRenderer {
    pub fn new(text: impl Into<String>, font: FontHandle, size: f32) -> Self {
        Self { text: text.into(), font, size, color: Color::WHITE, offset: Vec2::ZERO }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, g: &mut Graphics, _: &EngineContext, _: &Transform) -> anyhow::Result<()> {
        g.set_color(self.color);
        g.draw_text(self.text.as_str(), &self.font, self.size, self.offset);
        Ok(())
    }
}
