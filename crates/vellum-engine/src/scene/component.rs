use crate::core::EngineContext;
use crate::physics::RigidBody;
use crate::render::Graphics;

use super::{ComponentId, ScriptCtx, Transform};

/// Per-tick behavior attached to an entity.
pub trait Script: Send {
    fn tick(&mut self, ctx: &mut ScriptCtx<'_>) -> anyhow::Result<()>;

    /// The owning entity entered a scene.
    fn on_add_to_scene(&mut self, _entity: super::EntityId) {}

    /// The owning entity left its scene.
    fn on_remove_from_scene(&mut self, _entity: super::EntityId) {}

    /// Debug overlay drawn in entity-local space when script debugging is on.
    fn debug_render(&self, _g: &mut Graphics, _transform: &Transform) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Draws an entity. Called with the graphics origin at the entity position
/// and rotated by its rotation.
pub trait Renderer: Send {
    fn render(&mut self, g: &mut Graphics, ctx: &EngineContext, transform: &Transform) -> anyhow::Result<()>;

    fn debug_render(&self, _g: &mut Graphics, _transform: &Transform) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Component kinds, resolved once when the component is added.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ComponentKind {
    Transform,
    Script,
    Renderer,
    RigidBody,
}

/// A detachable behavior unit.
pub enum Component {
    Script(Box<dyn Script>),
    Renderer(Box<dyn Renderer>),
    RigidBody(RigidBody),
}

impl Component {
    pub fn script(script: impl Script + 'static) -> Self {
        Component::Script(Box::new(script))
    }

    pub fn renderer(renderer: impl Renderer + 'static) -> Self {
        Component::Renderer(Box::new(renderer))
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Script(_) => ComponentKind::Script,
            Component::Renderer(_) => ComponentKind::Renderer,
            Component::RigidBody(_) => ComponentKind::RigidBody,
        }
    }
}

impl From<RigidBody> for Component {
    fn from(body: RigidBody) -> Self {
        Component::RigidBody(body)
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::RigidBody(body) => f.debug_tuple("RigidBody").field(body).finish(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Read-only view of one component slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ComponentInfo {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub enabled: bool,
    /// Essential components cannot be removed.
    pub essential: bool,
}
