//! Physics bridge.
//!
//! Entities carry a [`RigidBody`] component describing the body in pixels;
//! the scene's [`PhysicsBridge`] owns the rapier world, converts at the
//! pixels-per-meter boundary and reports trigger transitions.

mod body;
mod bridge;
mod collider;
mod config;

pub use body::{BodyType, RigidBody};
pub use bridge::{PhysicsBridge, TriggerEvent};
pub use collider::{Collider, ColliderRef, ColliderShape, TriggerContact, TriggerListener};
pub use config::PhysicsConfig;
