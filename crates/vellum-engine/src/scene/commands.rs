use super::{Entity, EntityId, ZIndex};

/// Scene mutation requested from inside a tick.
pub(crate) enum Command {
    Spawn(Box<Entity>),
    Remove(EntityId),
    SetZ(EntityId, ZIndex),
}

/// Buffered scene mutations.
///
/// Scripts and trigger listeners cannot touch the scene while it is being
/// iterated; their requests are applied after the current phase returns.
#[derive(Default)]
pub struct SceneCommands {
    commands: Vec<Command>,
}

impl SceneCommands {
    /// Adds `entity` after the current phase. It ticks from the next tick on.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.commands.push(Command::Spawn(Box::new(entity)));
        id
    }

    /// Requests removal; applied at the next tick boundary like `Scene::remove`.
    pub fn remove(&mut self, id: EntityId) {
        self.commands.push(Command::Remove(id));
    }

    pub fn set_z(&mut self, id: EntityId, z: ZIndex) {
        self.commands.push(Command::SetZ(id, z));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }
}

impl std::fmt::Debug for SceneCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneCommands").field("pending", &self.commands.len()).finish()
    }
}
