use crate::coords::Vec2;
use crate::core::{EngineContext, EngineError};
use crate::paint::{Color, Stroke};
use crate::physics::{PhysicsBridge, RigidBody};
use crate::render::Graphics;

use super::{
    Component,
    ComponentId,
    ComponentInfo,
    ComponentKind,
    EntityId,
    Renderer,
    SceneCommands,
    Script,
    ScriptCtx,
    Transform,
    ZIndex,
};

const SOLID_OUTLINE: Color = Color::from_premul(0.0, 1.0, 0.0, 1.0);
const TRIGGER_OUTLINE: Color = Color::from_premul(1.0, 1.0, 0.0, 1.0);

struct Slot<T> {
    id: ComponentId,
    enabled: bool,
    value: T,
}

/// A named, z-ordered container of components.
///
/// Every entity carries a [`Transform`]. Scripts and renderers run in the
/// order they were added. At most one [`RigidBody`] may be attached; while
/// the entity is in a scene, the body owns the transform's position and
/// rotation.
pub struct Entity {
    id: EntityId,
    name: String,
    pub transform: Transform,
    z: ZIndex,
    dynamic: bool,

    order: Vec<(ComponentId, ComponentKind)>,
    scripts: Vec<Slot<Box<dyn Script>>>,
    renderers: Vec<Slot<Box<dyn Renderer>>>,
    body: Option<Slot<RigidBody>>,

    next_component: u32,
    in_scene: bool,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            transform: Transform::default(),
            z: ZIndex::default(),
            dynamic: true,
            order: vec![(ComponentId::TRANSFORM, ComponentKind::Transform)],
            scripts: Vec::new(),
            renderers: Vec::new(),
            body: None,
            next_component: 1,
            in_scene: false,
        }
    }

    // ── builders ──────────────────────────────────────────────────────────

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.transform.position = Vec2::new(x, y);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = ZIndex(z);
        self
    }

    /// Screen-space entity: ignores the camera and scene lighting.
    pub fn fixed(mut self) -> Self {
        self.dynamic = false;
        self
    }

    pub fn with_component(mut self, component: impl Into<Component>) -> Self {
        self.add_component(component.into());
        self
    }

    pub fn with_script(self, script: impl Script + 'static) -> Self {
        self.with_component(Component::script(script))
    }

    pub fn with_renderer(self, renderer: impl Renderer + 'static) -> Self {
        self.with_component(Component::renderer(renderer))
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn z(&self) -> ZIndex {
        self.z
    }

    /// World-space (camera, lighting) rather than screen-space.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    #[inline]
    pub fn in_scene(&self) -> bool {
        self.in_scene
    }

    pub fn rigid_body(&self) -> Option<&RigidBody> {
        self.body.as_ref().map(|s| &s.value)
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Component slots in insertion order, transform first.
    pub fn components(&self) -> Vec<ComponentInfo> {
        self.order
            .iter()
            .map(|&(id, kind)| ComponentInfo {
                id,
                kind,
                enabled: self.is_enabled(id).unwrap_or(true),
                essential: kind == ComponentKind::Transform,
            })
            .collect()
    }

    // ── components ────────────────────────────────────────────────────────

    /// Attaches a component and returns its id.
    ///
    /// Rejected with a warning: a rigid body owned by another entity, a
    /// second rigid body, and a rigid body added while the entity is in a
    /// scene (use `Scene::add_component` so it gets registered).
    pub fn add_component(&mut self, component: Component) -> Option<ComponentId> {
        if self.in_scene && matches!(component, Component::RigidBody(_)) {
            log::warn!("entity {} ({}): add rigid bodies to live entities through the scene", self.id, self.name);
            return None;
        }
        self.attach(component)
    }

    pub(crate) fn attach(&mut self, component: Component) -> Option<ComponentId> {
        let kind = component.kind();
        let id = ComponentId(self.next_component);

        match component {
            Component::Script(mut script) => {
                if self.in_scene {
                    script.on_add_to_scene(self.id);
                }
                self.scripts.push(Slot { id, enabled: true, value: script });
            }
            Component::Renderer(renderer) => {
                self.renderers.push(Slot { id, enabled: true, value: renderer });
            }
            Component::RigidBody(mut body) => {
                if let Some(owner) = body.owner.filter(|o| *o != self.id) {
                    log::warn!(
                        "entity {} ({}): rigid body already belongs to entity {owner}; ignored",
                        self.id,
                        self.name
                    );
                    return None;
                }
                if self.body.is_some() {
                    log::warn!("entity {} ({}): already has a rigid body; ignored", self.id, self.name);
                    return None;
                }
                body.owner = Some(self.id);
                self.body = Some(Slot { id, enabled: true, value: body });
            }
        }

        self.next_component += 1;
        self.order.push((id, kind));
        log::trace!("entity {} ({}): added {kind:?} {id:?}", self.id, self.name);
        Some(id)
    }

    /// Detaches a component. The transform is essential and stays.
    ///
    /// A registered rigid body must be removed through the scene so its
    /// native body is destroyed first.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        if id == ComponentId::TRANSFORM {
            log::debug!("entity {} ({}): transform is essential; not removed", self.id, self.name);
            return None;
        }
        if self.body.as_ref().is_some_and(|s| s.id == id && s.value.is_registered()) {
            log::warn!("entity {} ({}): remove registered rigid bodies through the scene", self.id, self.name);
            return None;
        }
        self.detach(id)
    }

    pub(crate) fn detach(&mut self, id: ComponentId) -> Option<Component> {
        let Some(pos) = self.order.iter().position(|(cid, _)| *cid == id) else {
            log::warn!("entity {} ({}): component {id:?} not present", self.id, self.name);
            return None;
        };
        let (_, kind) = self.order.remove(pos);

        let component = match kind {
            ComponentKind::Script => {
                let i = self.scripts.iter().position(|s| s.id == id)?;
                let mut script = self.scripts.remove(i).value;
                if self.in_scene {
                    script.on_remove_from_scene(self.id);
                }
                Component::Script(script)
            }
            ComponentKind::Renderer => {
                let i = self.renderers.iter().position(|s| s.id == id)?;
                Component::Renderer(self.renderers.remove(i).value)
            }
            ComponentKind::RigidBody => {
                let mut body = self.body.take()?.value;
                body.owner = None;
                Component::RigidBody(body)
            }
            ComponentKind::Transform => return None,
        };
        log::debug!("entity {} ({}): removed {kind:?} {id:?}", self.id, self.name);
        Some(component)
    }

    /// Id of the attached rigid body slot.
    pub fn rigid_body_id(&self) -> Option<ComponentId> {
        self.body.as_ref().map(|s| s.id)
    }

    /// Enables or disables a script or renderer. Returns `false` if the
    /// component is unknown or cannot be toggled.
    pub fn set_component_enabled(&mut self, id: ComponentId, enabled: bool) -> bool {
        if let Some(s) = self.scripts.iter_mut().find(|s| s.id == id) {
            s.enabled = enabled;
            return true;
        }
        if let Some(r) = self.renderers.iter_mut().find(|r| r.id == id) {
            r.enabled = enabled;
            return true;
        }
        false
    }

    pub fn is_enabled(&self, id: ComponentId) -> Option<bool> {
        self.scripts
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.enabled)
            .or_else(|| self.renderers.iter().find(|r| r.id == id).map(|r| r.enabled))
            .or_else(|| self.body.as_ref().filter(|b| b.id == id).map(|b| b.enabled))
    }

    // ── scene lifecycle ───────────────────────────────────────────────────

    pub(crate) fn set_z(&mut self, z: ZIndex) {
        self.z = z;
    }

    pub(crate) fn on_add_to_scene(&mut self, physics: &mut PhysicsBridge) {
        self.in_scene = true;
        if let Some(slot) = self.body.as_mut() {
            physics.register_body(self.id, &self.transform, &mut slot.value);
        }
        for slot in &mut self.scripts {
            slot.value.on_add_to_scene(self.id);
        }
    }

    pub(crate) fn on_remove_from_scene(&mut self, physics: &mut PhysicsBridge) {
        if let Some(slot) = self.body.as_mut() {
            physics.delete_body(&mut slot.value);
        }
        for slot in &mut self.scripts {
            slot.value.on_remove_from_scene(self.id);
        }
        self.in_scene = false;
    }

    pub(crate) fn register_body(&mut self, physics: &mut PhysicsBridge) {
        if let Some(slot) = self.body.as_mut() {
            physics.register_body(self.id, &self.transform, &mut slot.value);
        }
    }

    pub(crate) fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.body.as_mut().map(|s| &mut s.value)
    }

    // ── tick / render ─────────────────────────────────────────────────────

    /// Pulls the pose from physics, then runs every enabled script.
    pub(crate) fn tick(
        &mut self,
        engine: &mut EngineContext,
        commands: &mut SceneCommands,
        physics: &mut PhysicsBridge,
    ) -> anyhow::Result<()> {
        let handle = self.body.as_ref().and_then(|s| s.value.handle());
        if let Some((position, rotation)) = handle.and_then(|h| physics.body_pose(h)) {
            self.transform.position = position;
            self.transform.rotation = rotation;
        }

        for slot in self.scripts.iter_mut().filter(|s| s.enabled) {
            let mut ctx = ScriptCtx {
                entity: self.id,
                name: &self.name,
                transform: &mut self.transform,
                engine: &mut *engine,
                commands: &mut *commands,
                physics: &mut *physics,
                body: handle,
            };
            slot.value.tick(&mut ctx)?;
        }
        Ok(())
    }

    /// Draws the entity with its drawing state isolated by `push_all`/`pop_all`.
    ///
    /// Renderers must leave every stack as deep as they found it. Otherwise
    /// the stacks are unwound to where they were before this entity and
    /// [`EngineError::StackImbalance`] is returned.
    pub(crate) fn render(&mut self, g: &mut Graphics, ctx: &EngineContext) -> anyhow::Result<()> {
        let outer = g.depths();
        g.push_all();
        let drawn = self.render_local(g, ctx);

        let expected = outer.map(|d| d + 1);
        let found = g.depths();
        if found != expected {
            g.unwind_to(outer);
            drawn?;
            return Err(EngineError::StackImbalance { entity: self.name.clone(), expected, found }.into());
        }
        g.pop_all()?;
        drawn
    }

    fn render_local(&mut self, g: &mut Graphics, ctx: &EngineContext) -> anyhow::Result<()> {
        let t = self.transform;
        g.translate(t.position.x, t.position.y);
        g.rotate(t.rotation);
        if t.scale != Vec2::ONE {
            g.scale(t.scale.x, t.scale.y);
        }

        for slot in self.renderers.iter_mut().filter(|r| r.enabled) {
            slot.value.render(g, ctx, &t)?;
        }

        if ctx.debug.colliders {
            self.debug_colliders(g)?;
        }
        if ctx.debug.scripts {
            for slot in &self.scripts {
                slot.value.debug_render(g, &t)?;
            }
        }
        if ctx.debug.renderers {
            for slot in &self.renderers {
                slot.value.debug_render(g, &t)?;
            }
        }
        Ok(())
    }

    fn debug_colliders(&self, g: &mut Graphics) -> Result<(), EngineError> {
        let Some(body) = self.rigid_body() else {
            return Ok(());
        };
        g.push_color();
        g.push_stroke();
        g.set_stroke(Stroke::new(1.0));
        for collider in &body.colliders {
            g.set_color(if collider.trigger { TRIGGER_OUTLINE } else { SOLID_OUTLINE });
            g.draw_polygon(&collider.shape.outline());
        }
        g.pop_stroke()?;
        g.pop_color()
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("z", &self.z)
            .field("dynamic", &self.dynamic)
            .field("scripts", &self.scripts.len())
            .field("renderers", &self.renderers.len())
            .field("body", &self.rigid_body())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Collider, ColliderShape, PhysicsConfig};

    struct Noop;

    impl Script for Noop {
        fn tick(&mut self, _: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn body() -> RigidBody {
        RigidBody::dynamic().with_collider(Collider::new(ColliderShape::circle(4.0)))
    }

    #[test]
    fn transform_is_essential() {
        let mut e = Entity::new("player");
        assert!(e.remove_component(ComponentId::TRANSFORM).is_none());
        assert_eq!(e.components().len(), 1);
        assert!(e.components()[0].essential);
    }

    #[test]
    fn second_rigid_body_is_ignored() {
        let mut e = Entity::new("player").with_component(body());
        assert!(e.add_component(body().into()).is_none());
        assert_eq!(e.components().len(), 2);
    }

    #[test]
    fn body_owned_elsewhere_is_rejected() {
        let a = Entity::new("a").with_component(body());
        let stolen = a.rigid_body().cloned().unwrap();
        let mut b = Entity::new("b");
        assert!(b.add_component(stolen.into()).is_none());
        assert!(b.rigid_body().is_none());
    }

    #[test]
    fn detached_body_can_move_to_another_entity() {
        let mut a = Entity::new("a").with_component(body());
        let id = a.rigid_body_id().unwrap();
        let component = a.remove_component(id).unwrap();
        let mut b = Entity::new("b");
        assert!(b.add_component(component).is_some());
        assert_eq!(b.rigid_body().and_then(RigidBody::owner), Some(b.id()));
    }

    #[test]
    fn components_keep_insertion_order() {
        let mut e = Entity::new("e").with_script(Noop).with_component(body()).with_script(Noop);
        let kinds: Vec<_> = e.components().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [ComponentKind::Transform, ComponentKind::Script, ComponentKind::RigidBody, ComponentKind::Script]
        );

        let missing = ComponentId(99);
        assert!(e.remove_component(missing).is_none());
        assert!(!e.set_component_enabled(missing, false));
        assert_eq!(e.script_count(), 2);
    }

    #[test]
    fn tick_pulls_pose_from_physics() {
        let mut physics = PhysicsBridge::new(PhysicsConfig::default()).unwrap();
        let mut e = Entity::new("falling").at(100.0, 100.0).with_component(body());
        e.on_add_to_scene(&mut physics);
        physics.tick(60);

        let mut engine = EngineContext::new(&crate::core::EngineConfig::default());
        let mut commands = SceneCommands::default();
        e.tick(&mut engine, &mut commands, &mut physics).unwrap();
        assert!(e.transform.position.y > 100.0);
        assert_eq!(e.transform.position.x, 100.0);
    }

    #[test]
    fn debug_colliders_outline_and_restore_state() {
        let mut g = Graphics::new(crate::coords::Viewport::new(100.0, 100.0));
        let mut engine = EngineContext::new(&crate::core::EngineConfig::default());
        engine.debug.colliders = true;
        let mut e = Entity::new("outlined").at(10.0, 10.0).with_component(body());

        g.begin_frame(Color::BLACK);
        e.render(&mut g, &engine).unwrap();

        assert_eq!(g.draw_list().count_kind("polygon"), 1);
        assert_eq!(g.depths(), [0; 5]);
        assert_eq!(g.state().color, Color::WHITE);
    }
}
