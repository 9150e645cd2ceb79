use rapier2d::prelude::RigidBodyHandle;

use crate::coords::Vec2;
use crate::scene::EntityId;

use super::Collider;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BodyType {
    Static,
    #[default]
    Dynamic,
    Kinematic,
}

/// Rigid body component.
///
/// Tunables are read once when the body is registered with the scene's
/// physics bridge. While registered, the bridge owns the native body and
/// the entity transform follows it.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub body_type: BodyType,
    /// Total mass in kg, split evenly across the colliders.
    pub mass: f32,
    pub friction: f32,
    /// Restitution in `[0, 1]`.
    pub elasticity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub fixed_rotation: bool,
    /// Initial linear velocity in pixels per second.
    pub initial_velocity: Vec2,
    pub colliders: Vec<Collider>,

    pub(crate) handle: Option<RigidBodyHandle>,
    pub(crate) owner: Option<EntityId>,
}

impl RigidBody {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            mass: 1.0,
            friction: 0.5,
            elasticity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            fixed_rotation: false,
            initial_velocity: Vec2::ZERO,
            colliders: Vec::new(),
            handle: None,
            owner: None,
        }
    }

    pub fn fixed() -> Self {
        Self::new(BodyType::Static)
    }

    pub fn dynamic() -> Self {
        Self::new(BodyType::Dynamic)
    }

    pub fn kinematic() -> Self {
        Self::new(BodyType::Kinematic)
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    pub fn with_velocity(mut self, px_per_sec: Vec2) -> Self {
        self.initial_velocity = px_per_sec;
        self
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        self.handle.is_some()
    }

    #[inline]
    pub fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    /// Entity this body was attached to, if any.
    #[inline]
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }
}
