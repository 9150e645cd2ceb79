//! Opaque asset handles consumed by renderers.
//!
//! Loading, decoding and caching live with the host's asset factories; the core
//! only holds decoded pixels and identifiers.

mod animation;
mod image;

pub use animation::Animation;
pub use image::{Image, ImageHandle, ImageId};

/// Font registered with the host's text backend.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FontHandle {
    pub id: u32,
    pub family: String,
}

impl FontHandle {
    pub fn new(id: u32, family: impl Into<String>) -> Self {
        Self { id, family: family.into() }
    }
}
