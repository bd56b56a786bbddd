//! World - owns every persistent entity of the current scene

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::entity::Entity;

/// The scene's entity store
///
/// Entities live in a dense vector in spawn order; `index` maps ids to
/// slots. Entities stay until the scene is cleared.
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<Entity>,
    index: AHashMap<EntityId, usize>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&slot| &self.entities[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.index.get(&id)?;
        self.entities.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Per-frame update of every active entity
    pub fn update(&mut self, dt: f32) {
        for entity in &mut self.entities {
            entity.update(dt);
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_lookup() {
        let mut world = World::new();
        let id = world.spawn(Entity::new("hero"));
        assert_eq!(world.get(id).unwrap().name(), "hero");
        assert!(world.get_mut(id).is_some());
    }

    #[test]
    fn test_clear_drops_index() {
        let mut world = World::new();
        let a = world.spawn(Entity::new("a"));
        world.spawn(Entity::new("b"));
        world.clear();
        assert!(world.is_empty());
        assert!(world.get(a).is_none());
        let c = world.spawn(Entity::new("c"));
        assert_eq!(world.get(c).unwrap().name(), "c");
    }
}
