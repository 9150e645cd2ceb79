use crate::coords::Vec2;
use crate::render::{DrawCmd, Graphics};

#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: Vec2,
    pub to: Vec2,
}

impl Graphics {
    /// Records a line segment using the current stroke.
    #[inline]
    pub fn draw_line(&mut self, from: Vec2, to: Vec2) {
        let (from, to) = (self.map_point(from), self.map_point(to));
        self.record(DrawCmd::Line(LineCmd { from, to }));
    }
}
