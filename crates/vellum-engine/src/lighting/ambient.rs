use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::assets::{Image, ImageHandle, ImageId};
use crate::core::EngineError;
use crate::paint::Color;

/// Images per worker thread when re-tinting.
const IMAGES_PER_WORKER: usize = 16;

/// Ambient light tint and the table of pre-tinted images.
///
/// The table is replaced as a whole: readers see either the previous set of
/// tinted images or the complete new set, never a mix.
#[derive(Debug, Clone)]
pub struct AmbientLight {
    tint: Color,
    table: Arc<HashMap<ImageId, ImageHandle>>,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self { tint: Color::WHITE, table: Arc::new(HashMap::new()) }
    }
}

impl AmbientLight {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tint(&self) -> Color {
        self.tint
    }

    /// Number of images with a tinted copy.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Tinted copy of `image`, or `image` itself when it was not part of the
    /// last recompute.
    pub fn lit(&self, image: &ImageHandle) -> ImageHandle {
        self.table.get(&image.id()).cloned().unwrap_or_else(|| image.clone())
    }

    /// Re-tints every image under `tint` on a bounded worker pool.
    ///
    /// The pool has one worker per 16 images, capped at the available
    /// parallelism. If any image fails, the previous table and tint stay in
    /// place and the first error is returned.
    pub fn recompute(&mut self, images: &[ImageHandle], tint: Color) -> Result<(), EngineError> {
        let cap = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let workers = (images.len() / IMAGES_PER_WORKER + 1).clamp(1, cap);

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ambient-light-{i}"))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;

        let tinted: Vec<ImageHandle> =
            pool.install(|| images.par_iter().map(|h| tint_image(h, tint)).collect::<Result<_, _>>())?;

        self.table = Arc::new(tinted.into_iter().map(|h| (h.id(), h)).collect());
        self.tint = tint;
        log::debug!("ambient light: re-tinted {} images on {workers} workers", self.table.len());
        Ok(())
    }
}

fn tint_image(handle: &ImageHandle, tint: Color) -> Result<ImageHandle, EngineError> {
    let src = handle.image();
    src.validate()?;

    let (tr, tg, tb, _) = tint.to_straight();
    let scale = |c: u8, t: f32| (f32::from(c) * t).round().clamp(0.0, 255.0) as u8;
    let pixels = src
        .pixels
        .chunks_exact(4)
        .flat_map(|p| [scale(p[0], tr), scale(p[1], tg), scale(p[2], tb), p[3]])
        .collect();

    let image = Image { name: src.name.clone(), width: src.width, height: src.height, pixels };
    Ok(ImageHandle::derived(handle.id(), image))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ImageHandle> {
        (0..n).map(|i| ImageHandle::new(Image::solid(format!("img{i}"), 2, 2, [200, 100, 50, 255]))).collect()
    }

    #[test]
    fn recompute_tints_every_image() {
        let imgs = images(40);
        let mut light = AmbientLight::new();
        light.recompute(&imgs, Color::from_straight(0.5, 1.0, 0.0, 1.0)).unwrap();

        assert_eq!(light.len(), 40);
        for h in &imgs {
            let lit = light.lit(h);
            assert_eq!(lit.id(), h.id());
            assert!(!lit.same_pixels(h));
            assert_eq!(lit.image().pixel(1, 1), Some([100, 100, 0, 255]));
        }
    }

    #[test]
    fn unknown_image_is_returned_untouched() {
        let light = AmbientLight::new();
        let h = images(1).remove(0);
        assert!(light.lit(&h).same_pixels(&h));
    }

    #[test]
    fn failure_keeps_previous_table() {
        let mut imgs = images(20);
        let mut light = AmbientLight::new();
        light.recompute(&imgs, Color::WHITE).unwrap();
        let before = light.lit(&imgs[0]);

        let broken = Image { name: "broken".into(), width: 4, height: 4, pixels: vec![0; 3] };
        imgs.push(ImageHandle::new(broken));
        let dark = Color::from_straight(0.1, 0.1, 0.1, 1.0);

        let err = light.recompute(&imgs, dark).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAsset { .. }));
        assert_eq!(light.tint(), Color::WHITE);
        assert_eq!(light.len(), 20);
        assert!(light.lit(&imgs[0]).same_pixels(&before));
    }
}
