use rapier2d::prelude::RigidBodyHandle;

use crate::coords::Vec2;
use crate::core::EngineContext;
use crate::input::InputSnapshot;
use crate::physics::PhysicsBridge;

use super::{EntityId, SceneCommands, Transform};

/// Everything a [`Script`](super::Script) may touch during its tick.
pub struct ScriptCtx<'a> {
    pub entity: EntityId,
    pub name: &'a str,
    pub transform: &'a mut Transform,
    pub engine: &'a mut EngineContext,
    pub commands: &'a mut SceneCommands,
    pub(crate) physics: &'a mut PhysicsBridge,
    pub(crate) body: Option<RigidBodyHandle>,
}

impl ScriptCtx<'_> {
    #[inline]
    pub fn input(&self) -> &InputSnapshot {
        &self.engine.input
    }

    /// Whether the entity has a registered rigid body.
    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Body velocity in pixels per second.
    pub fn velocity(&self) -> Option<Vec2> {
        self.body.and_then(|h| self.physics.linear_velocity(h))
    }

    pub fn set_velocity(&mut self, px_per_sec: Vec2) {
        if let Some(h) = self.body {
            self.physics.set_linear_velocity(h, px_per_sec);
        }
    }

    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if let Some(h) = self.body {
            self.physics.apply_impulse(h, impulse);
        }
    }

    /// Moves the entity, including its body when it has one.
    pub fn teleport(&mut self, position: Vec2) {
        self.transform.position = position;
        if let Some(h) = self.body {
            self.physics.set_body_position(h, position, self.transform.rotation);
        }
    }
}
