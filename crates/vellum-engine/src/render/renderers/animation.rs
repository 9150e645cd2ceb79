use crate::assets::Animation;
use crate::coords::Vec2;
use crate::core::EngineContext;
use crate::render::Graphics;
use crate::scene::{Renderer, Transform};

use super::sprite::draw_centered;

/// Plays an [`Animation`] driven by the engine tick counter.
#[derive(Debug, Clone)]
pub struct AnimationRenderer {
    animation: Animation,
    size: Vec2,
    started_at: Option<u64>,
}

impl AnimationRenderer {
    pub fn new(animation: Animation, size: Vec2) -> Self {
        Self { animation, size, started_at: None }
    }

    /// Restarts from the first frame on the next render.
    pub fn restart(&mut self) {
        self.started_at = None;
    }
}

impl Renderer for AnimationRenderer {
    fn render(&mut self, g: &mut Graphics, ctx: &EngineContext, _: &Transform) -> anyhow::Result<()> {
        let start = *self.started_at.get_or_insert(ctx.tick());
        if let Some(frame) = self.animation.frame_at(ctx.tick().saturating_sub(start)) {
            draw_centered(g, ctx, frame, self.size);
        }
        Ok(())
    }
}
