//! Ambient scene lighting.
//!
//! Dynamic entities are drawn with lighting enabled; sprite renderers then
//! swap each image for its tinted copy from [`AmbientLight`].

mod ambient;

pub use ambient::AmbientLight;
