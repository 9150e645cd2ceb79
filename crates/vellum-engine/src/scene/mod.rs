//! Scene graph.
//!
//! Responsibilities:
//! - entity/component model (transform, scripts, renderers, one rigid body)
//! - z-ordered membership with deferred removal
//! - per-tick snapshot shared by tick and render
//! - buffered mutations from scripts and trigger listeners

mod commands;
mod component;
mod entity;
mod graph;
mod id;
mod script;
mod transform;
mod z_index;

pub use commands::SceneCommands;
pub use component::{Component, ComponentInfo, ComponentKind, Renderer, Script};
pub use entity::Entity;
pub use graph::Scene;
pub use id::{ComponentId, EntityId};
pub use script::ScriptCtx;
pub use transform::Transform;
pub use z_index::ZIndex;
