use crate::coords::Vec2;
use crate::core::EngineContext;
use crate::paint::{Color, Stroke};
use crate::render::Graphics;
use crate::scene::{Renderer, Transform};

/// Primitive drawn by a [`ShapeRenderer`], centered on the entity origin.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
    Polygon { points: Vec<Vec2> },
}

/// Solid or outlined primitive in a single color.
#[derive(Debug, Clone)]
pub struct ShapeRenderer {
    pub shape: ShapeKind,
    pub color: Color,
    /// Outline stroke; `None` fills.
    pub outline: Option<Stroke>,
}

impl ShapeRenderer {
    pub fn filled(shape: ShapeKind, color: Color) -> Self {
        Self { shape, color, outline: None }
    }

    pub fn outlined(shape: ShapeKind, color: Color, stroke: Stroke) -> Self {
        Self { shape, color, outline: Some(stroke) }
    }
}

impl Renderer for ShapeRenderer {
    fn render(&mut self, g: &mut Graphics, _: &EngineContext, _: &Transform) -> anyhow::Result<()> {
        g.set_color(self.color);
        if let Some(stroke) = self.outline {
            g.set_stroke(stroke);
        }
        let fill = self.outline.is_none();

        match &self.shape {
            ShapeKind::Rect { width, height } => {
                let (x, y) = (-width / 2.0, -height / 2.0);
                if fill {
                    g.fill_rect(x, y, *width, *height);
                } else {
                    g.draw_rect(x, y, *width, *height);
                }
            }
            ShapeKind::Circle { radius } => {
                if fill {
                    g.fill_circle(Vec2::ZERO, *radius);
                } else {
                    g.draw_circle(Vec2::ZERO, *radius);
                }
            }
            ShapeKind::Polygon { points } => {
                if fill {
                    g.fill_polygon(points);
                } else {
                    g.draw_polygon(points);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Viewport};
    use crate::core::EngineConfig;
    use crate::render::DrawCmd;

    #[test]
    fn rect_is_centered_and_mapped() {
        let ctx = EngineContext::new(&EngineConfig::default());
        let mut g = Graphics::new(Viewport::new(1920.0, 1080.0));
        g.bind(Viewport::new(1920.0, 1080.0), Viewport::new(960.0, 540.0));

        let mut r = ShapeRenderer::outlined(
            ShapeKind::Rect { width: 40.0, height: 20.0 },
            Color::WHITE,
            Stroke::new(4.0),
        );
        r.render(&mut g, &ctx, &Transform::default()).unwrap();

        let item = &g.draw_list().items()[0];
        assert_eq!(item.stroke.width, 2.0);
        match &item.cmd {
            DrawCmd::Rect(cmd) => {
                assert!(!cmd.filled);
                assert_eq!(cmd.rect, Rect::new(-10.0, -5.0, 20.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
