use std::collections::HashMap;
use std::num::NonZeroUsize;

use rapier2d::crossbeam::channel::unbounded;
use rapier2d::prelude::{
    ActiveEvents,
    CCDSolver,
    ChannelEventCollector,
    ColliderBuilder,
    ColliderHandle,
    ColliderSet,
    CollisionEvent,
    ContactForceEvent,
    DefaultBroadPhase,
    Group,
    ImpulseJointSet,
    IntegrationParameters,
    InteractionGroups,
    IslandManager,
    MultibodyJointSet,
    NarrowPhase,
    PhysicsPipeline,
    Point,
    Real,
    RigidBodyBuilder,
    RigidBodyHandle,
    RigidBodySet,
    Rotation,
    SharedShape,
    Vector,
};

use crate::coords::Vec2;
use crate::core::EngineError;
use crate::scene::{EntityId, Transform};

use super::{BodyType, ColliderRef, ColliderShape, PhysicsConfig, RigidBody};

/// Begin or end of an overlap between a trigger and a solid collider.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TriggerEvent {
    Enter { trigger: ColliderRef, other: ColliderRef },
    Exit { trigger: ColliderRef, other: ColliderRef },
}

#[derive(Debug, Copy, Clone)]
struct Fixture {
    at: ColliderRef,
    sensor: bool,
}

/// Event for a contact between two fixtures, if exactly one is a trigger.
fn trigger_event(a: Fixture, b: Fixture, started: bool) -> Option<TriggerEvent> {
    if a.sensor == b.sensor {
        return None;
    }
    let (trigger, other) = if a.sensor { (a.at, b.at) } else { (b.at, a.at) };
    Some(if started {
        TriggerEvent::Enter { trigger, other }
    } else {
        TriggerEvent::Exit { trigger, other }
    })
}

/// Rigid-body world of one scene.
///
/// Everything outside this type is in pixels; everything inside the rapier
/// sets is in meters. Linear quantities go through
/// [`PhysicsConfig::to_meters`] on the way in and
/// [`PhysicsConfig::to_pixels`] on the way out. Angles pass through
/// unchanged.
pub struct PhysicsBridge {
    config: PhysicsConfig,

    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,

    owners: HashMap<RigidBodyHandle, EntityId>,
    fixtures: HashMap<ColliderHandle, Fixture>,
    /// Exits for trigger overlaps ended by a body deletion, not yet reported.
    removed_contacts: Vec<TriggerEvent>,
}

impl PhysicsBridge {
    pub fn new(config: PhysicsConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            owners: HashMap::new(),
            fixtures: HashMap::new(),
            removed_contacts: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replaces gravity and iteration counts for subsequent steps.
    ///
    /// Invalid configs are rejected and the current one is kept. Existing
    /// bodies keep their pixel positions only if the scale is unchanged, so
    /// with live bodies `pixels_per_meter` is left as it was.
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), EngineError> {
        config.validate()?;
        if config.pixels_per_meter != self.config.pixels_per_meter && !self.bodies.is_empty() {
            log::warn!("physics: ignoring pixels_per_meter change with {} live bodies", self.bodies.len());
            self.config = PhysicsConfig { pixels_per_meter: self.config.pixels_per_meter, ..config };
        } else {
            self.config = config;
        }
        Ok(())
    }

    /// Number of native bodies in the world.
    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // ── registration ──────────────────────────────────────────────────────

    /// Creates the native body and fixtures for `body`, owned by `entity`.
    ///
    /// Already registered bodies are left alone with a warning. Colliders
    /// that produce no usable shape are skipped with a warning; the body's
    /// mass is shared among the remaining ones.
    pub fn register_body(&mut self, entity: EntityId, transform: &Transform, body: &mut RigidBody) {
        if let Some(handle) = body.handle {
            log::warn!("physics: body of entity {entity} already registered as {handle:?}");
            return;
        }
        if body.colliders.is_empty() {
            log::warn!("physics: rigid body of entity {entity} has no colliders");
        }

        let config = self.config;
        let builder = match body.body_type {
            BodyType::Static => RigidBodyBuilder::fixed(),
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
            BodyType::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
        };
        let mut builder = builder
            .translation(to_vector(transform.position, &config))
            .rotation(transform.rotation)
            .linvel(to_vector(body.initial_velocity, &config))
            .linear_damping(body.linear_damping)
            .angular_damping(body.angular_damping);
        if body.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder.build());

        let shapes: Vec<_> = body
            .colliders
            .iter()
            .enumerate()
            .filter_map(|(index, collider)| match build_shape(&collider.shape, &config) {
                Some(shape) => Some((index, collider, shape)),
                None => {
                    log::warn!("physics: collider {index} of entity {entity} has no usable shape; skipped");
                    None
                }
            })
            .collect();

        let collider_mass = body.mass / shapes.len().max(1) as f32;
        for (index, collider, (shape, offset)) in shapes {
            let native = ColliderBuilder::new(shape)
                .translation(offset)
                .friction(body.friction)
                .restitution(body.elasticity)
                .mass(collider_mass)
                .sensor(collider.trigger)
                .collision_groups(interaction_groups(collider.group, entity))
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .user_data(encode_user_data(entity, index))
                .build();
            let ch = self.colliders.insert_with_parent(native, handle, &mut self.bodies);
            self.fixtures.insert(
                ch,
                Fixture { at: ColliderRef { entity, index }, sensor: collider.trigger },
            );
        }

        self.owners.insert(handle, entity);
        body.handle = Some(handle);
        log::debug!("physics: registered {:?} body {handle:?} for entity {entity}", body.body_type);
    }

    /// Destroys the native body of `body`, if any. Idempotent.
    ///
    /// Trigger overlaps the body was part of are ended: their exits are
    /// queued and come out of [`take_removed_contacts`](Self::take_removed_contacts)
    /// or the next [`tick`](Self::tick).
    pub fn delete_body(&mut self, body: &mut RigidBody) {
        let Some(handle) = body.handle.take() else {
            return;
        };
        if let Some(native) = self.bodies.get(handle) {
            for &ch in native.colliders() {
                let Some(own) = self.fixtures.remove(&ch) else {
                    continue;
                };
                for (h1, h2, intersecting) in self.narrow_phase.intersection_pairs_with(ch) {
                    let peer = if h1 == ch { h2 } else { h1 };
                    let Some(&other) = self.fixtures.get(&peer).filter(|_| intersecting) else {
                        continue;
                    };
                    if let Some(event) = trigger_event(own, other, false) {
                        log::trace!("physics: trigger exit by deletion {event:?}");
                        self.removed_contacts.push(event);
                    }
                }
            }
        }
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        let owner = self.owners.remove(&handle);
        log::debug!("physics: deleted body {handle:?} (owner {owner:?})");
    }

    /// Exits queued by [`delete_body`](Self::delete_body) since the last
    /// step or call.
    pub fn take_removed_contacts(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.removed_contacts)
    }

    // ── stepping ──────────────────────────────────────────────────────────

    /// Advances the world by `1 / ticks_per_second` seconds and returns the
    /// trigger transitions observed during the step, preceded by any exits
    /// queued by deletions.
    ///
    /// A contact becomes a [`TriggerEvent`] only when exactly one side is a
    /// trigger.
    pub fn tick(&mut self, ticks_per_second: u32) -> Vec<TriggerEvent> {
        self.params.dt = 1.0 / ticks_per_second.max(1) as Real;
        self.params.num_solver_iterations =
            NonZeroUsize::new(self.config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.params.num_internal_stabilization_iterations = self.config.position_iterations;
        let gravity = Vector::new(self.config.gravity.x, self.config.gravity.y);

        let (collision_send, collision_recv) = unbounded::<CollisionEvent>();
        let (force_send, _force_recv) = unbounded::<ContactForceEvent>();
        let events = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &events,
        );

        let mut out = self.take_removed_contacts();
        while let Ok(event) = collision_recv.try_recv() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };
            // Fixtures of deleted bodies are forgotten; their exits were
            // queued by `delete_body`.
            let (Some(&a), Some(&b)) = (self.fixtures.get(&h1), self.fixtures.get(&h2)) else {
                continue;
            };
            if let Some(event) = trigger_event(a, b, started) {
                log::trace!("physics: {event:?}");
                out.push(event);
            }
        }
        out
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Position (pixels) and rotation (radians) of a native body.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        let rb = self.bodies.get(handle)?;
        Some((from_vector(*rb.translation(), &self.config), rb.rotation().angle()))
    }

    /// Linear velocity in pixels per second.
    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let rb = self.bodies.get(handle)?;
        Some(from_vector(*rb.linvel(), &self.config))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, px_per_sec: Vec2) {
        let v = to_vector(px_per_sec, &self.config);
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_linvel(v, true);
        }
    }

    /// Applies an impulse given in kg·px/s at the center of mass.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        let j = to_vector(impulse, &self.config);
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.apply_impulse(j, true);
        }
    }

    /// Moves a body to a pixel position, used when scripts teleport an entity.
    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec2, rotation: f32) {
        let t = to_vector(position, &self.config);
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_translation(t, true);
            rb.set_rotation(Rotation::new(rotation), true);
        }
    }

    /// Entity owning a native body.
    pub fn owner_of(&self, handle: RigidBodyHandle) -> Option<EntityId> {
        self.owners.get(&handle).copied()
    }
}

impl std::fmt::Debug for PhysicsBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsBridge")
            .field("config", &self.config)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish_non_exhaustive()
    }
}

#[inline]
fn to_vector(px: Vec2, config: &PhysicsConfig) -> Vector<Real> {
    Vector::new(config.to_meters(px.x), config.to_meters(px.y))
}

#[inline]
fn from_vector(m: Vector<Real>, config: &PhysicsConfig) -> Vec2 {
    Vec2::new(config.to_pixels(m.x), config.to_pixels(m.y))
}

/// Native shape plus its offset from the body origin, both in meters.
fn build_shape(shape: &ColliderShape, config: &PhysicsConfig) -> Option<(SharedShape, Vector<Real>)> {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    match shape {
        ColliderShape::Circle { radius, offset } => usable(*radius)
            .then(|| (SharedShape::ball(config.to_meters(*radius)), to_vector(*offset, config))),
        ColliderShape::Box { width, height, offset } => (usable(*width) && usable(*height)).then(|| {
            let (hx, hy) = (config.to_meters(width / 2.0), config.to_meters(height / 2.0));
            (SharedShape::cuboid(hx, hy), to_vector(*offset, config))
        }),
        ColliderShape::Polygon { sides, radius, offset } => {
            if *sides < 3 || !usable(*radius) {
                return None;
            }
            let ring = ColliderShape::Polygon { sides: *sides, radius: *radius, offset: Vec2::ZERO };
            hull(&ring.outline(), config).map(|s| (s, to_vector(*offset, config)))
        }
        ColliderShape::ArbitraryPoints { points } => hull(points, config).map(|s| (s, Vector::zeros())),
    }
}

fn hull(points: &[Vec2], config: &PhysicsConfig) -> Option<SharedShape> {
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return None;
    }
    let pts: Vec<Point<Real>> = points
        .iter()
        .map(|p| Point::new(config.to_meters(p.x), config.to_meters(p.y)))
        .collect();
    SharedShape::convex_hull(&pts)
}

/// Maps a signed group number onto rapier membership/filter masks.
fn interaction_groups(group: i32, entity: EntityId) -> InteractionGroups {
    let n = group.unsigned_abs();
    if group == 0 {
        return InteractionGroups::all();
    }
    if n > 32 {
        log::warn!("physics: collision group {group} of entity {entity} out of range; using 0");
        return InteractionGroups::all();
    }
    let bit = Group::from_bits_truncate(1 << (n - 1));
    if group > 0 {
        InteractionGroups::new(bit, Group::ALL)
    } else {
        InteractionGroups::new(bit, Group::ALL.difference(bit))
    }
}

#[inline]
fn encode_user_data(entity: EntityId, index: usize) -> u128 {
    (u128::from(entity.raw()) << 32) | index as u128
}
