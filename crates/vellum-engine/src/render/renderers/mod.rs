//! Stock renderer components.
//!
//! Each draws around the entity origin; the scene has already applied the
//! entity translation and rotation.

mod animation;
mod shape;
mod sprite;
mod text;

pub use animation::AnimationRenderer;
pub use shape::{ShapeKind, ShapeRenderer};
pub use sprite::SpriteRenderer;
pub use text::TextRenderer;
