use crate::assets::ImageHandle;
use crate::coords::Rect;
use crate::render::{DrawCmd, Graphics};

/// Image blit into `dest` (actual pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub image: ImageHandle,
    pub dest: Rect,
}

impl Graphics {
    /// Draws `image` stretched into the reference-pixel rectangle.
    #[inline]
    pub fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32, w: f32, h: f32) {
        let dest = self.map_rect(Rect::new(x, y, w, h));
        self.record(DrawCmd::Image(ImageCmd { image: image.clone(), dest }));
    }
}
