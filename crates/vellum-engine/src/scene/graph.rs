use std::collections::{BTreeMap, HashMap};

use crate::core::{EngineContext, EngineError};
use crate::physics::{PhysicsBridge, PhysicsConfig, TriggerContact, TriggerEvent};
use crate::render::Graphics;

use super::commands::Command;
use super::{Component, ComponentId, Entity, EntityId, SceneCommands, ZIndex};

/// Z-ordered collection of entities with its own physics world.
///
/// Removal is deferred: [`remove`](Self::remove) only queues the entity and
/// the next [`tick`](Self::tick) applies it before taking the snapshot. The
/// snapshot taken by a tick is what the following [`render`](Self::render)
/// draws, so tick and render of one frame see the same entities.
pub struct Scene {
    name: String,
    entities: HashMap<EntityId, Entity>,
    buckets: BTreeMap<ZIndex, Vec<EntityId>>,
    pending_removal: Vec<EntityId>,
    snapshot: Vec<(ZIndex, EntityId)>,
    physics: PhysicsBridge,
    commands: SceneCommands,
}

impl Scene {
    /// Creates an empty scene; fails if `physics` does not validate.
    pub fn new(name: impl Into<String>, physics: PhysicsConfig) -> Result<Self, EngineError> {
        Ok(Self {
            name: name.into(),
            entities: HashMap::new(),
            buckets: BTreeMap::new(),
            pending_removal: Vec::new(),
            snapshot: Vec::new(),
            physics: PhysicsBridge::new(physics)?,
            commands: SceneCommands::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    // ── membership ────────────────────────────────────────────────────────

    /// Adds `entity`, registering its rigid body and notifying its scripts.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id();
        self.buckets.entry(entity.z()).or_default().push(id);
        entity.on_add_to_scene(&mut self.physics);
        log::debug!("scene {}: added entity {id} ({}) at z {}", self.name, entity.name(), entity.z().0);
        self.entities.insert(id, entity);
        id
    }

    /// Queues `id` for removal at the start of the next tick.
    ///
    /// Repeated requests before that tick are merged.
    pub fn remove(&mut self, id: EntityId) {
        if !self.entities.contains_key(&id) {
            log::warn!("scene {}: remove of unknown entity {id}", self.name);
            return;
        }
        if !self.pending_removal.contains(&id) {
            self.pending_removal.push(id);
        }
    }

    /// Takes `id` out of the scene immediately, destroying its physics body.
    ///
    /// Must not be used while the scene is ticking; scripts use
    /// [`SceneCommands::remove`] instead.
    pub fn detach(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        self.unbucket(id, entity.z());
        self.pending_removal.retain(|p| *p != id);
        self.snapshot.retain(|(_, s)| *s != id);
        entity.on_remove_from_scene(&mut self.physics);
        log::debug!("scene {}: detached entity {id}", self.name);
        Some(entity)
    }

    /// Moves an entity into `other`. Its body is recreated in `other`'s world
    /// at the entity's current pose.
    pub fn transfer(&mut self, id: EntityId, other: &mut Scene) -> bool {
        match self.detach(id) {
            Some(entity) => {
                other.add(entity);
                true
            }
            None => false,
        }
    }

    /// Moves an entity to another z bucket as one step.
    pub fn update_z_order(&mut self, id: EntityId, z: ZIndex) {
        let Some(entity) = self.entities.get_mut(&id) else {
            log::warn!("scene {}: z update for unknown entity {id}", self.name);
            return;
        };
        let old = entity.z();
        if old == z {
            return;
        }
        entity.set_z(z);
        self.unbucket(id, old);
        self.buckets.entry(z).or_default().push(id);
        log::trace!("scene {}: entity {id} z {} -> {}", self.name, old.0, z.0);
    }

    fn unbucket(&mut self, id: EntityId, z: ZIndex) {
        if let Some(bucket) = self.buckets.get_mut(&z) {
            bucket.retain(|e| *e != id);
            if bucket.is_empty() {
                self.buckets.remove(&z);
            }
        }
    }

    // ── components on live entities ───────────────────────────────────────

    /// Attaches a component to a live entity, registering rigid bodies
    /// right away.
    pub fn add_component(&mut self, id: EntityId, component: Component) -> Option<ComponentId> {
        let entity = self.entities.get_mut(&id)?;
        let is_body = matches!(component, Component::RigidBody(_));
        let cid = entity.attach(component)?;
        if is_body {
            entity.register_body(&mut self.physics);
        }
        Some(cid)
    }

    /// Detaches a component from a live entity, destroying its native body
    /// first when it is the rigid body.
    pub fn remove_component(&mut self, id: EntityId, cid: ComponentId) -> Option<Component> {
        let entity = self.entities.get_mut(&id)?;
        if entity.rigid_body_id() == Some(cid) {
            if let Some(body) = entity.body_mut() {
                self.physics.delete_body(body);
            }
        }
        entity.remove_component(cid)
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Number of entities, including those queued for removal.
    #[inline]
    pub fn size(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// First entity named `name` in z order.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.ids().find(|id| self.entities.get(id).is_some_and(|e| e.name() == name))
    }

    /// Entity ids in z order (ascending).
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.buckets.values().flatten().copied()
    }

    /// Snapshot taken by the last tick.
    pub fn snapshot(&self) -> &[(ZIndex, EntityId)] {
        &self.snapshot
    }

    pub fn physics(&self) -> &PhysicsBridge {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsBridge {
        &mut self.physics
    }

    // ── tick / render ─────────────────────────────────────────────────────

    /// Runs one simulation tick.
    ///
    /// Order: flush removals, snapshot, entity ticks, script commands,
    /// physics step, trigger callbacks, their commands.
    pub fn tick(&mut self, ticks_per_second: u32, ctx: &mut EngineContext) -> anyhow::Result<()> {
        self.flush_removals();

        self.snapshot.clear();
        for (z, ids) in &self.buckets {
            self.snapshot.extend(ids.iter().map(|id| (*z, *id)));
        }

        for &(_, id) in &self.snapshot {
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.tick(ctx, &mut self.commands, &mut self.physics)?;
            }
        }
        self.apply_commands();

        let events = self.physics.tick(ticks_per_second);
        self.dispatch_triggers(&events, &[]);
        self.apply_commands();
        Ok(())
    }

    /// Drops queued entities, then reports the trigger exits their bodies
    /// ended while the removed entities can still resolve listeners.
    fn flush_removals(&mut self) {
        if self.pending_removal.is_empty() {
            return;
        }
        let mut removed = Vec::new();
        for id in std::mem::take(&mut self.pending_removal) {
            let Some(mut entity) = self.entities.remove(&id) else {
                continue;
            };
            self.unbucket(id, entity.z());
            entity.on_remove_from_scene(&mut self.physics);
            log::debug!("scene {}: removed entity {id} ({})", self.name, entity.name());
            removed.push(entity);
        }

        let exits = self.physics.take_removed_contacts();
        self.dispatch_triggers(&exits, &removed);
        self.apply_commands();
    }

    fn dispatch_triggers(&mut self, events: &[TriggerEvent], removed: &[Entity]) {
        for event in events {
            let (contact, enter) = match *event {
                TriggerEvent::Enter { trigger, other } => (TriggerContact { trigger, other }, true),
                TriggerEvent::Exit { trigger, other } => (TriggerContact { trigger, other }, false),
            };
            let owner = contact.trigger.entity;
            let listener = self
                .entities
                .get(&owner)
                .or_else(|| removed.iter().find(|e| e.id() == owner))
                .and_then(|e| e.rigid_body())
                .and_then(|b| b.colliders.get(contact.trigger.index))
                .and_then(|c| c.listener().cloned());
            let Some(listener) = listener else {
                continue;
            };
            if enter {
                listener.on_trigger_enter(&contact, &mut self.commands);
            } else {
                listener.on_trigger_exit(&contact, &mut self.commands);
            }
        }
    }

    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let commands: Vec<Command> = self.commands.drain().collect();
        for command in commands {
            match command {
                Command::Spawn(entity) => {
                    self.add(*entity);
                }
                Command::Remove(id) => self.remove(id),
                Command::SetZ(id, z) => self.update_z_order(id, z),
            }
        }
    }

    /// Draws the entities of the last snapshot back to front.
    ///
    /// Dynamic entities are drawn through the camera with lighting on;
    /// fixed entities are drawn in screen space with lighting off.
    pub fn render(&mut self, g: &mut Graphics, ctx: &EngineContext) -> anyhow::Result<()> {
        let (offset, zoom) = (ctx.camera.position(), ctx.camera.zoom());
        for &(_, id) in &self.snapshot {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            if entity.is_dynamic() {
                g.set_lighting(true);
                g.push_transform();
                g.scale(zoom, zoom);
                g.translate(-offset.x, -offset.y);
                let drawn = entity.render(g, ctx);
                g.pop_transform()?;
                drawn?;
            } else {
                g.set_lighting(false);
                entity.render(g, ctx)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("buckets", &self.buckets.len())
            .field("pending_removal", &self.pending_removal)
            .field("physics", &self.physics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::coords::{Vec2, Viewport};
    use crate::core::EngineConfig;
    use crate::paint::Color;
    use crate::physics::{Collider, ColliderShape, RigidBody, TriggerListener};
    use crate::scene::{Renderer, Script, ScriptCtx, Transform};

    fn scene() -> Scene {
        Scene::new("test", PhysicsConfig::default()).unwrap()
    }

    fn engine() -> EngineContext {
        EngineContext::new(&EngineConfig::default())
    }

    fn buckets_holding(s: &Scene, id: EntityId) -> usize {
        s.buckets.values().filter(|b| b.contains(&id)).count()
    }

    #[derive(Default)]
    struct Lifecycle {
        added: AtomicUsize,
        removed: AtomicUsize,
        ticks: AtomicUsize,
    }

    struct Probe(Arc<Lifecycle>);

    impl Script for Probe {
        fn tick(&mut self, _: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
            self.0.ticks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn on_add_to_scene(&mut self, _: EntityId) {
            self.0.added.fetch_add(1, Ordering::SeqCst);
        }
        fn on_remove_from_scene(&mut self, _: EntityId) {
            self.0.removed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Square(Color);

    impl Renderer for Square {
        fn render(&mut self, g: &mut Graphics, _: &EngineContext, _: &Transform) -> anyhow::Result<()> {
            g.set_color(self.0);
            g.fill_rect(0.0, 0.0, 10.0, 10.0);
            Ok(())
        }
    }

    struct Leaky;

    impl Renderer for Leaky {
        fn render(&mut self, g: &mut Graphics, _: &EngineContext, _: &Transform) -> anyhow::Result<()> {
            g.set_color(Color::BLACK);
            g.push_color();
            Ok(())
        }
    }

    struct RemoveSelf;

    impl Script for RemoveSelf {
        fn tick(&mut self, ctx: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
            ctx.commands.remove(ctx.entity);
            Ok(())
        }
    }

    // ── membership ────────────────────────────────────────────────────────

    #[test]
    fn z_reassignment_keeps_size_and_single_bucket() {
        let mut s = scene();
        let ids: Vec<_> = (0..5).map(|i| s.add(Entity::new(format!("e{i}")).with_z(i))).collect();

        for (step, z) in [3, -7, 3, 100, 0, 0].into_iter().enumerate() {
            let id = ids[step % ids.len()];
            s.update_z_order(id, ZIndex(z));
            assert_eq!(s.size(), 5);
            assert_eq!(buckets_holding(&s, id), 1);
            assert_eq!(s.entity(id).map(Entity::z), Some(ZIndex(z)));
        }
        assert_eq!(s.ids().count(), 5);
    }

    #[test]
    fn double_remove_notifies_once() {
        let probe = Arc::new(Lifecycle::default());
        let mut s = scene();
        let id = s.add(Entity::new("probe").with_script(Probe(probe.clone())));
        assert_eq!(probe.added.load(Ordering::SeqCst), 1);

        s.remove(id);
        s.remove(id);
        assert!(s.contains(id), "removal is deferred to the next tick");

        let mut ctx = engine();
        s.tick(60, &mut ctx).unwrap();
        s.tick(60, &mut ctx).unwrap();
        assert!(!s.contains(id));
        assert_eq!(probe.removed.load(Ordering::SeqCst), 1);
        assert_eq!(probe.ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removal_destroys_physics_body() {
        let mut s = scene();
        let body = RigidBody::dynamic().with_collider(Collider::new(ColliderShape::circle(4.0)));
        let id = s.add(Entity::new("ball").with_component(body));
        assert_eq!(s.physics().body_count(), 1);

        s.remove(id);
        s.tick(60, &mut engine()).unwrap();
        assert_eq!(s.physics().body_count(), 0);
    }

    #[test]
    fn transfer_moves_entity_and_body() {
        let mut a = scene();
        let mut b = scene();
        let body = RigidBody::fixed().with_collider(Collider::new(ColliderShape::rect(8.0, 8.0)));
        let id = a.add(Entity::new("crate").at(50.0, 50.0).with_component(body));

        assert!(a.transfer(id, &mut b));
        assert!(!a.contains(id) && b.contains(id));
        assert_eq!(a.physics().body_count(), 0);
        assert_eq!(b.physics().body_count(), 1);
        assert_eq!(b.find_by_name("crate"), Some(id));
    }

    #[test]
    fn live_body_add_and_remove_go_through_physics() {
        let mut s = scene();
        let id = s.add(Entity::new("late"));
        let body = RigidBody::dynamic().with_collider(Collider::new(ColliderShape::circle(2.0)));

        let direct = s.entity_mut(id).and_then(|e| e.add_component(body.clone().into()));
        assert!(direct.is_none());

        let cid = s.add_component(id, body.into()).unwrap();
        assert_eq!(s.physics().body_count(), 1);
        assert!(matches!(s.remove_component(id, cid), Some(Component::RigidBody(_))));
        assert_eq!(s.physics().body_count(), 0);
    }

    // ── tick / render ─────────────────────────────────────────────────────

    #[test]
    fn snapshot_is_stable_for_the_frame() {
        let mut s = scene();
        let mut g = Graphics::new(Viewport::new(100.0, 100.0));
        let mut ctx = engine();
        let id = s.add(Entity::new("blink").with_script(RemoveSelf).with_renderer(Square(Color::WHITE)));

        s.tick(60, &mut ctx).unwrap();
        assert!(s.contains(id));
        g.begin_frame(Color::BLACK);
        s.render(&mut g, &ctx).unwrap();
        assert_eq!(g.draw_list().count_kind("rect"), 1);

        s.tick(60, &mut ctx).unwrap();
        assert!(!s.contains(id));
        g.begin_frame(Color::BLACK);
        s.render(&mut g, &ctx).unwrap();
        assert_eq!(g.draw_list().count_kind("rect"), 0);
    }

    #[test]
    fn render_is_back_to_front_and_balanced() {
        let mut s = scene();
        let mut g = Graphics::new(Viewport::new(100.0, 100.0));
        let mut ctx = engine();
        let red = Color::from_srgb_u8(255, 0, 0, 255);
        let blue = Color::from_srgb_u8(0, 0, 255, 255);
        s.add(Entity::new("top").with_z(5).with_renderer(Square(red)));
        s.add(Entity::new("bottom").with_z(-5).with_renderer(Square(blue)));

        s.tick(60, &mut ctx).unwrap();
        g.begin_frame(Color::BLACK);
        s.render(&mut g, &ctx).unwrap();

        let colors: Vec<_> = g.draw_list().items().iter().skip(1).map(|i| i.color).collect();
        assert_eq!(colors, [blue, red]);
        assert_eq!(g.depths(), [0; 5]);
    }

    #[test]
    fn fixed_entities_skip_camera_and_lighting() {
        let mut s = scene();
        let mut g = Graphics::new(Viewport::new(100.0, 100.0));
        let mut ctx = engine();
        ctx.camera.set_position(Vec2::new(30.0, 0.0));
        s.add(Entity::new("world").at(50.0, 0.0).with_renderer(Square(Color::WHITE)));
        s.add(Entity::new("hud").at(50.0, 0.0).with_z(1).fixed().with_renderer(Square(Color::WHITE)));

        s.tick(60, &mut ctx).unwrap();
        g.begin_frame(Color::BLACK);
        s.render(&mut g, &ctx).unwrap();

        let items = &g.draw_list().items()[1..];
        assert_eq!(items[0].transform.apply(Vec2::ZERO), Vec2::new(20.0, 0.0));
        assert!(items[0].lit);
        assert_eq!(items[1].transform.apply(Vec2::ZERO), Vec2::new(50.0, 0.0));
        assert!(!items[1].lit);
    }

    #[derive(Default)]
    struct Zone {
        enter: AtomicUsize,
        exit: AtomicUsize,
    }

    impl TriggerListener for Zone {
        fn on_trigger_enter(&self, contact: &TriggerContact, commands: &mut SceneCommands) {
            self.enter.fetch_add(1, Ordering::SeqCst);
            commands.set_z(contact.other.entity, ZIndex(9));
        }
        fn on_trigger_exit(&self, _: &TriggerContact, _: &mut SceneCommands) {
            self.exit.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn trigger_listeners_fire_from_scene_tick() {
        let mut s = scene();
        let mut ctx = engine();
        let zone = Arc::new(Zone::default());
        let sensor = RigidBody::fixed()
            .with_collider(Collider::trigger(ColliderShape::rect(100.0, 40.0), zone.clone()));
        s.add(Entity::new("zone").at(400.0, 150.0).with_component(sensor));
        let ball = RigidBody::dynamic().with_collider(Collider::new(ColliderShape::circle(8.0)));
        let ball = s.add(Entity::new("ball").at(400.0, 50.0).with_component(ball));

        for _ in 0..180 {
            s.tick(60, &mut ctx).unwrap();
        }
        assert_eq!(zone.enter.load(Ordering::SeqCst), 1);
        assert_eq!(zone.exit.load(Ordering::SeqCst), 1);
        assert_eq!(s.entity(ball).map(Entity::z), Some(ZIndex(9)));
    }

    #[test]
    fn removing_an_entity_inside_a_trigger_ends_the_overlap() {
        let weightless = PhysicsConfig { gravity: Vec2::ZERO, ..PhysicsConfig::default() };
        let mut s = Scene::new("test", weightless).unwrap();
        let mut ctx = engine();
        let zone = Arc::new(Zone::default());
        let sensor = RigidBody::fixed()
            .with_collider(Collider::trigger(ColliderShape::rect(100.0, 100.0), zone.clone()));
        s.add(Entity::new("zone").at(400.0, 150.0).with_component(sensor));
        let ball = RigidBody::dynamic().with_collider(Collider::new(ColliderShape::circle(8.0)));
        let ball = s.add(Entity::new("ball").at(400.0, 150.0).with_component(ball));

        for _ in 0..5 {
            s.tick(60, &mut ctx).unwrap();
        }
        assert_eq!(zone.enter.load(Ordering::SeqCst), 1);
        assert_eq!(zone.exit.load(Ordering::SeqCst), 0);

        s.remove(ball);
        for _ in 0..5 {
            s.tick(60, &mut ctx).unwrap();
        }
        assert!(!s.contains(ball));
        assert_eq!(zone.enter.load(Ordering::SeqCst), 1);
        assert_eq!(zone.exit.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removing_the_trigger_itself_still_reaches_its_listener() {
        let weightless = PhysicsConfig { gravity: Vec2::ZERO, ..PhysicsConfig::default() };
        let mut s = Scene::new("test", weightless).unwrap();
        let mut ctx = engine();
        let zone = Arc::new(Zone::default());
        let sensor = RigidBody::fixed()
            .with_collider(Collider::trigger(ColliderShape::rect(100.0, 100.0), zone.clone()));
        let trigger = s.add(Entity::new("zone").at(400.0, 150.0).with_component(sensor));
        let ball = RigidBody::dynamic().with_collider(Collider::new(ColliderShape::circle(8.0)));
        s.add(Entity::new("ball").at(400.0, 150.0).with_component(ball));

        for _ in 0..5 {
            s.tick(60, &mut ctx).unwrap();
        }
        s.remove(trigger);
        s.tick(60, &mut ctx).unwrap();
        assert_eq!(zone.exit.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_physics_config_fails_at_construction() {
        let flat = PhysicsConfig { pixels_per_meter: 0.0, ..PhysicsConfig::default() };
        assert!(matches!(Scene::new("broken", flat), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn unbalanced_renderer_fails_the_frame_and_is_unwound() {
        let mut s = scene();
        let mut g = Graphics::new(Viewport::new(100.0, 100.0));
        let mut ctx = engine();
        s.add(Entity::new("leaky").with_renderer(Leaky));
        s.add(Entity::new("after").with_z(1).with_renderer(Square(Color::WHITE)));

        s.tick(60, &mut ctx).unwrap();
        g.begin_frame(Color::BLACK);
        let err = s.render(&mut g, &ctx).unwrap_err();

        match err.downcast_ref::<EngineError>() {
            Some(EngineError::StackImbalance { entity, expected, found }) => {
                assert_eq!(entity, "leaky");
                // The camera transform push of the scene sits underneath.
                assert_eq!(expected, &[2, 1, 1, 1, 1]);
                assert_eq!(found, &[2, 1, 1, 1, 2]);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(g.depths(), [0; 5]);
        assert_eq!(g.state().color, Color::WHITE);
        assert_eq!(g.draw_list().count_kind("rect"), 0);
    }
}
