//! Level-driven stat progression

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::entity::Entity;
use crate::modifier::{Modifier, ProgressionSource};

/// Health multiplier for a progression level
///
/// Linear growth of 15% per level past the first, plus a 10% milestone
/// bonus every 5 levels. Level 1 is exactly 1.0.
pub fn health_multiplier(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * 0.15 + (level / 5) as f32 * 0.1
}

/// Scales max health, speed, attack cadence, and perception from the
/// entity's baseline as the host level rises
pub struct ProgressionModifier {
    source: Box<dyn ProgressionSource>,
    /// Level last materialized per entity; `update` re-applies only when
    /// the source moved off this value
    applied: AHashMap<EntityId, u32>,
}

impl ProgressionModifier {
    pub fn new(source: Box<dyn ProgressionSource>) -> Self {
        Self { source, applied: AHashMap::new() }
    }
}

impl Modifier for ProgressionModifier {
    fn apply(&mut self, entity: &mut Entity) {
        let level = self.source.level();
        let bonus_levels = level.saturating_sub(1) as f32;

        entity.max_health = entity.base.max_health * health_multiplier(level);
        entity.health = entity.max_health;
        entity.speed = entity.base.speed * (1.0 + 0.05 * bonus_levels);
        entity.attack_cooldown_ms =
            entity.base.attack_cooldown_ms * (1.0 - 0.02 * bonus_levels as f64).max(0.0);
        entity.detection_range = entity.base.detection_range * (1.0 + 0.03 * bonus_levels);

        self.applied.insert(entity.id, level);
    }

    fn update(&mut self, entity: &mut Entity, _dt: f32) {
        let level = self.source.level();
        if self.applied.get(&entity.id) != Some(&level) {
            self.apply(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityOverrides;
    use crate::modifier::{FixedLevel, SharedLevel};

    #[test]
    fn test_multiplier_level_one_is_identity() {
        assert_eq!(health_multiplier(1), 1.0);
    }

    #[test]
    fn test_multiplier_level_six() {
        // 1 + 5*0.15 + 1*0.1
        assert!((health_multiplier(6) - 1.85).abs() < 1e-6);
    }

    #[test]
    fn test_apply_at_level_one_changes_nothing() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let mut modifier = ProgressionModifier::new(Box::new(FixedLevel(1)));

        modifier.apply(&mut entity);

        assert_eq!(entity.max_health, 100.0);
        assert_eq!(entity.speed, entity.base.speed);
        assert_eq!(entity.attack_cooldown_ms, 1000.0);
        assert_eq!(entity.detection_range, 10.0);
    }

    #[test]
    fn test_apply_scales_from_baseline_not_current() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let mut modifier = ProgressionModifier::new(Box::new(FixedLevel(2)));

        // Applying twice must not compound
        modifier.apply(&mut entity);
        modifier.apply(&mut entity);

        assert!((entity.max_health - 115.0).abs() < 1e-4);
        assert!((entity.speed - entity.base.speed * 1.05).abs() < 1e-5);
        assert!((entity.attack_cooldown_ms - 980.0).abs() < 1e-6);
        assert!((entity.detection_range - 10.3).abs() < 1e-5);
    }

    #[test]
    fn test_apply_heals_to_new_max() {
        let mut entity = Entity::with_overrides(EntityOverrides {
            health: Some(40.0),
            ..Default::default()
        });
        let mut modifier = ProgressionModifier::new(Box::new(FixedLevel(6)));

        modifier.apply(&mut entity);

        assert!((entity.max_health - 185.0).abs() < 1e-4);
        assert_eq!(entity.health, entity.max_health);
    }

    #[test]
    fn test_update_noop_while_level_unchanged() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let shared = SharedLevel::new(3);
        let mut modifier = ProgressionModifier::new(Box::new(shared.clone()));

        modifier.apply(&mut entity);
        entity.health = 50.0;

        modifier.update(&mut entity, 0.016);

        // No re-apply: the mid-fight health loss survives
        assert_eq!(entity.health, 50.0);
    }

    #[test]
    fn test_update_reapplies_on_level_up() {
        let mut entity = Entity::with_overrides(EntityOverrides::default());
        let shared = SharedLevel::new(1);
        let handle = shared.handle();
        let mut modifier = ProgressionModifier::new(Box::new(shared));

        modifier.apply(&mut entity);
        handle.set(6);
        modifier.update(&mut entity, 0.016);

        assert!((entity.max_health - 185.0).abs() < 1e-4);
        assert_eq!(entity.health, entity.max_health);
    }
}
