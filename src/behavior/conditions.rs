//! Eligibility conditions as data plus one pure evaluator
//!
//! Conditions carry no executable state; everything needed to decide
//! eligibility is the entity and the per-tick selection context, which makes
//! them trivially testable and serializable.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Comparison operator applied between an observed value and the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl Comparison {
    pub fn compare(&self, observed: f32, threshold: f32) -> bool {
        match self {
            Comparison::Less => observed < threshold,
            Comparison::LessEq => observed <= threshold,
            Comparison::Greater => observed > threshold,
            Comparison::GreaterEq => observed >= threshold,
        }
    }
}

/// What a condition observes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    /// health / max_health, compared against the threshold
    HealthRatio,
    /// Distance to the resolved target, compared against the threshold;
    /// false when there is no resolvable target
    TargetDistance,
    /// True when no resolvable target sits within the entity's own
    /// detection range; threshold and operator are unused
    TargetClear,
}

/// A single eligibility predicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub op: Comparison,
    pub threshold: f32,
}

impl Condition {
    pub fn new(kind: ConditionKind, op: Comparison, threshold: f32) -> Self {
        Self { kind, op, threshold }
    }
}

/// Per-tick facts the evaluator needs beyond the entity itself
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionCtx {
    /// Distance to the entity's target, if the target resolves in the
    /// registry snapshot
    pub target_distance: Option<f32>,
}

/// Evaluate one condition; a behavior is eligible only if every condition
/// in its list evaluates true
pub fn evaluate(condition: &Condition, entity: &Entity, ctx: &SelectionCtx) -> bool {
    match condition.kind {
        ConditionKind::HealthRatio => {
            let ratio = if entity.max_health > 0.0 {
                entity.health / entity.max_health
            } else {
                0.0
            };
            condition.op.compare(ratio, condition.threshold)
        }
        ConditionKind::TargetDistance => match ctx.target_distance {
            Some(distance) => condition.op.compare(distance, condition.threshold),
            None => false,
        },
        ConditionKind::TargetClear => match ctx.target_distance {
            Some(distance) => distance > entity.detection_range,
            None => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityOverrides;

    fn entity_with_health(health: f32, max_health: f32) -> Entity {
        Entity::with_overrides(EntityOverrides {
            health: Some(health),
            max_health: Some(max_health),
            ..Default::default()
        })
    }

    #[test]
    fn test_health_ratio_strict_less() {
        let condition = Condition::new(ConditionKind::HealthRatio, Comparison::Less, 0.3);
        let ctx = SelectionCtx::default();

        assert!(evaluate(&condition, &entity_with_health(29.0, 100.0), &ctx));
        // Exactly at the threshold: strict < excludes
        assert!(!evaluate(&condition, &entity_with_health(30.0, 100.0), &ctx));
    }

    #[test]
    fn test_health_ratio_strict_greater() {
        let condition = Condition::new(ConditionKind::HealthRatio, Comparison::Greater, 0.3);
        let ctx = SelectionCtx::default();

        assert!(evaluate(&condition, &entity_with_health(31.0, 100.0), &ctx));
        // Exactly at the threshold: strict > excludes
        assert!(!evaluate(&condition, &entity_with_health(30.0, 100.0), &ctx));
    }

    #[test]
    fn test_zero_max_health_counts_as_zero_ratio() {
        let condition = Condition::new(ConditionKind::HealthRatio, Comparison::Greater, 0.1);
        let ctx = SelectionCtx::default();
        assert!(!evaluate(&condition, &entity_with_health(0.0, 0.0), &ctx));
    }

    #[test]
    fn test_target_distance_requires_resolved_target() {
        let condition = Condition::new(ConditionKind::TargetDistance, Comparison::LessEq, 20.0);
        let entity = entity_with_health(100.0, 100.0);

        assert!(!evaluate(&condition, &entity, &SelectionCtx { target_distance: None }));
        assert!(evaluate(
            &condition,
            &entity,
            &SelectionCtx { target_distance: Some(15.0) }
        ));
        assert!(!evaluate(
            &condition,
            &entity,
            &SelectionCtx { target_distance: Some(25.0) }
        ));
    }

    #[test]
    fn test_target_clear_uses_detection_range() {
        let condition = Condition::new(ConditionKind::TargetClear, Comparison::Greater, 0.0);
        let entity = Entity::with_overrides(EntityOverrides {
            detection_range: Some(10.0),
            ..Default::default()
        });

        // No target at all is clear
        assert!(evaluate(&condition, &entity, &SelectionCtx { target_distance: None }));
        // Target outside detection is clear
        assert!(evaluate(
            &condition,
            &entity,
            &SelectionCtx { target_distance: Some(12.0) }
        ));
        // Target inside detection is not
        assert!(!evaluate(
            &condition,
            &entity,
            &SelectionCtx { target_distance: Some(8.0) }
        ));
    }
}
