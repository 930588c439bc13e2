//! Entity registry - owns all entity records

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::entity::Entity;

/// Storage for every live entity, keyed by id
#[derive(Debug, Default)]
pub struct Registry {
    entities: AHashMap<EntityId, Entity>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Stable id snapshot for tick iteration; tolerates mid-tick removal
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityOverrides;

    #[test]
    fn test_insert_and_get() {
        let mut registry = Registry::new();
        let id = registry.insert(Entity::with_overrides(EntityOverrides::default()));
        assert!(registry.contains(id));
        assert_eq!(registry.get(id).unwrap().id, id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_returns_record() {
        let mut registry = Registry::new();
        let id = registry.insert(Entity::with_overrides(EntityOverrides::default()));
        let removed = registry.remove(id);
        assert!(removed.is_some());
        assert!(registry.is_empty());
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn test_ids_snapshot_detached_from_storage() {
        let mut registry = Registry::new();
        let a = registry.insert(Entity::with_overrides(EntityOverrides::default()));
        let b = registry.insert(Entity::with_overrides(EntityOverrides::default()));

        let ids = registry.ids();
        registry.remove(a);

        // Snapshot still lists both; lookups simply miss for the removed one
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
        assert!(registry.get(a).is_none());
    }
}
