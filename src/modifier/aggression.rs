//! Difficulty-driven aggression scaling

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::entity::Entity;
use crate::modifier::{AggressionSource, Modifier};

/// Scales each entity's aggression from its baseline by the host's
/// difficulty scalar
pub struct AggressionModifier {
    source: Box<dyn AggressionSource>,
    applied: AHashMap<EntityId, f32>,
}

impl AggressionModifier {
    pub fn new(source: Box<dyn AggressionSource>) -> Self {
        Self { source, applied: AHashMap::new() }
    }
}

impl Modifier for AggressionModifier {
    fn apply(&mut self, entity: &mut Entity) {
        let scalar = self.source.aggression();
        entity.aggression_level = entity.base.aggression_level * scalar;
        self.applied.insert(entity.id, scalar);
    }

    fn update(&mut self, entity: &mut Entity, _dt: f32) {
        let scalar = self.source.aggression();
        let unchanged = self
            .applied
            .get(&entity.id)
            .is_some_and(|last| (last - scalar).abs() <= f32::EPSILON);
        if !unchanged {
            self.apply(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityOverrides;
    use crate::modifier::{FixedAggression, SharedAggression};

    #[test]
    fn test_apply_scales_baseline() {
        let mut entity = Entity::with_overrides(EntityOverrides {
            aggression_level: Some(0.8),
            ..Default::default()
        });
        let mut modifier = AggressionModifier::new(Box::new(FixedAggression(1.5)));

        modifier.apply(&mut entity);

        assert!((entity.aggression_level - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_apply_twice_does_not_compound() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let mut modifier = AggressionModifier::new(Box::new(FixedAggression(2.0)));

        modifier.apply(&mut entity);
        modifier.apply(&mut entity);

        assert!((entity.aggression_level - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_update_follows_source_change() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let shared = SharedAggression::new(1.0);
        let handle = shared.handle();
        let mut modifier = AggressionModifier::new(Box::new(shared));

        modifier.apply(&mut entity);
        handle.set(0.5);
        modifier.update(&mut entity, 0.016);

        assert!((entity.aggression_level - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_update_noop_when_source_steady() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let mut modifier = AggressionModifier::new(Box::new(FixedAggression(1.0)));

        modifier.apply(&mut entity);
        // Host tinkering with the stat is preserved until the source moves
        entity.aggression_level = 0.25;
        modifier.update(&mut entity, 0.016);

        assert_eq!(entity.aggression_level, 0.25);
    }
}
