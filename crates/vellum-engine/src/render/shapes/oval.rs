use crate::coords::{Rect, Vec2};
use crate::render::{DrawCmd, Graphics};

/// Ellipse inscribed in `bounds` (actual pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct OvalCmd {
    pub bounds: Rect,
    pub filled: bool,
}

impl Graphics {
    #[inline]
    pub fn fill_oval(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let bounds = self.map_rect(Rect::new(x, y, w, h));
        self.record(DrawCmd::Oval(OvalCmd { bounds, filled: true }));
    }

    #[inline]
    pub fn draw_oval(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let bounds = self.map_rect(Rect::new(x, y, w, h));
        self.record(DrawCmd::Oval(OvalCmd { bounds, filled: false }));
    }

    /// Circle of `radius` around `center`. Becomes an ellipse when the
    /// reference and actual aspect ratios differ.
    #[inline]
    pub fn fill_circle(&mut self, center: Vec2, radius: f32) {
        let r = Rect::from_center(center, Vec2::splat(radius * 2.0));
        self.fill_oval(r.origin.x, r.origin.y, r.size.x, r.size.y);
    }

    #[inline]
    pub fn draw_circle(&mut self, center: Vec2, radius: f32) {
        let r = Rect::from_center(center, Vec2::splat(radius * 2.0));
        self.draw_oval(r.origin.x, r.origin.y, r.size.x, r.size.y);
    }
}
