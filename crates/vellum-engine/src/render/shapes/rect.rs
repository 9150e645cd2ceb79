use crate::coords::Rect;
use crate::render::{DrawCmd, Graphics};

/// Rectangle payload in actual pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub filled: bool,
}

impl Graphics {
    /// Records a filled rectangle (reference pixels, local space).
    #[inline]
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = self.map_rect(Rect::new(x, y, w, h));
        self.record(DrawCmd::Rect(RectCmd { rect, filled: true }));
    }

    /// Records a rectangle outline using the current stroke.
    #[inline]
    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = self.map_rect(Rect::new(x, y, w, h));
        self.record(DrawCmd::Rect(RectCmd { rect, filled: false }));
    }
}
