use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::EngineError;

/// Stable identity of a decoded image, shared by all clones of its handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ImageId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Decoded RGBA8 pixels (straight alpha, row-major).
///
/// The engine never decodes files; asset factories hand images over already
/// decoded.
pub struct Image {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Validates the buffer length against the dimensions.
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        let image = Self { name: name.into(), width, height, pixels };
        image.validate()?;
        Ok(image)
    }

    /// Single-color image, handy for placeholders and tests.
    pub fn solid(name: impl Into<String>, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba.repeat((width * height) as usize);
        Self { name: name.into(), width, height, pixels }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(EngineError::InvalidAsset {
                name: self.name.clone(),
                reason: format!("expected {expected} bytes of RGBA8, found {}", self.pixels.len()),
            });
        }
        Ok(())
    }

    /// Pixel at `(x, y)` or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Cheap, cloneable reference to an [`Image`].
#[derive(Debug, Clone)]
pub struct ImageHandle {
    id: ImageId,
    image: Arc<Image>,
}

impl ImageHandle {
    pub fn new(image: Image) -> Self {
        Self { id: ImageId::next(), image: Arc::new(image) }
    }

    /// Wraps a derived image (e.g. a tinted copy) under an existing identity.
    pub(crate) fn derived(id: ImageId, image: Image) -> Self {
        Self { id, image: Arc::new(image) }
    }

    #[inline]
    pub fn id(&self) -> ImageId {
        self.id
    }

    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// True when both handles point at the same pixel buffer.
    #[inline]
    pub fn same_pixels(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.same_pixels(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let err = Image::new("broken", 2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAsset { .. }));
    }

    #[test]
    fn clones_share_identity() {
        let h = ImageHandle::new(Image::solid("dot", 1, 1, [255, 0, 0, 255]));
        let c = h.clone();
        assert_eq!(h, c);
        assert_eq!(c.image().pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(c.image().pixel(1, 0), None);
    }
}
