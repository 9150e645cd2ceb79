//! Vellum engine crate.
//!
//! Runtime core of a 2D real-time engine: fixed-timestep loop, z-ordered scene
//! of component-composed entities, rapier-backed physics bridge, tweened camera
//! and a resolution-independent drawing pipeline.

pub mod assets;
pub mod camera;
pub mod core;
pub mod input;
pub mod lighting;
pub mod physics;
pub mod render;
pub mod scene;
pub mod time;

pub mod logging;
pub mod coords;
pub mod paint;

pub use crate::core::{EngineConfig, EngineContext, EngineError, GameLoop, LoopCore};
pub use crate::scene::{Component, Entity, EntityId, Scene, ZIndex};
