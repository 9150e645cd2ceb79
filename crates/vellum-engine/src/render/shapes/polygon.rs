use crate::coords::Vec2;
use crate::render::{DrawCmd, Graphics};

/// Polygon or polyline through `points` (actual pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCmd {
    pub points: Vec<Vec2>,
    pub filled: bool,
    /// Whether the outline joins the last point back to the first.
    pub closed: bool,
}

impl Graphics {
    pub fn fill_polygon(&mut self, points: &[Vec2]) {
        self.record_polygon(points, true, true);
    }

    pub fn draw_polygon(&mut self, points: &[Vec2]) {
        self.record_polygon(points, false, true);
    }

    pub fn draw_polyline(&mut self, points: &[Vec2]) {
        self.record_polygon(points, false, false);
    }

    fn record_polygon(&mut self, points: &[Vec2], filled: bool, closed: bool) {
        if points.len() < 2 {
            return;
        }
        let points = points.iter().map(|p| self.map_point(*p)).collect();
        self.record(DrawCmd::Polygon(PolygonCmd { points, filled, closed }));
    }
}
