use crate::assets::ImageHandle;
use crate::coords::Vec2;
use crate::core::EngineContext;
use crate::render::Graphics;
use crate::scene::{Renderer, Transform};

/// Draws an image centered on the entity origin.
#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    image: ImageHandle,
    /// Draw size in reference pixels; defaults to the image size.
    pub size: Vec2,
}

impl SpriteRenderer {
    pub fn new(image: ImageHandle) -> Self {
        let size = Vec2::new(image.width() as f32, image.height() as f32);
        Self { image, size }
    }

    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        self.size = Vec2::new(w, h);
        self
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }
}

impl Renderer for SpriteRenderer {
    fn render(&mut self, g: &mut Graphics, ctx: &EngineContext, _: &Transform) -> anyhow::Result<()> {
        draw_centered(g, ctx, &self.image, self.size);
        Ok(())
    }
}

/// Draws `image` centered on the origin, swapping in its lit copy when
/// lighting is enabled for this draw.
pub(super) fn draw_centered(g: &mut Graphics, ctx: &EngineContext, image: &ImageHandle, size: Vec2) {
    let half = size / 2.0;
    if g.lighting() {
        let lit = ctx.ambient.lit(image);
        g.draw_image(&lit, -half.x, -half.y, size.x, size.y);
    } else {
        g.draw_image(image, -half.x, -half.y, size.x, size.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Image;
    use crate::coords::Viewport;
    use crate::core::EngineConfig;
    use crate::paint::Color;
    use crate::render::DrawCmd;

    #[test]
    fn lit_copy_is_used_only_with_lighting() {
        let image = ImageHandle::new(Image::solid("hero", 4, 4, [255, 255, 255, 255]));
        let mut ctx = EngineContext::new(&EngineConfig::default());
        ctx.ambient.recompute(std::slice::from_ref(&image), Color::from_straight(0.5, 0.5, 0.5, 1.0)).unwrap();

        let mut g = Graphics::new(Viewport::new(100.0, 100.0));
        let mut sprite = SpriteRenderer::new(image.clone());
        let t = Transform::default();

        g.set_lighting(true);
        sprite.render(&mut g, &ctx, &t).unwrap();
        g.set_lighting(false);
        sprite.render(&mut g, &ctx, &t).unwrap();

        let drawn: Vec<_> = g
            .draw_list()
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Image(cmd) => Some(cmd.image.same_pixels(&image)),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, [false, true]);
    }
}
