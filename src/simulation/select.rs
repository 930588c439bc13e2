//! Behavior selection - the heart of the per-tick decision

use crate::behavior::catalog::{BehaviorKind, BehaviorSpec};
use crate::behavior::conditions::{evaluate, SelectionCtx};
use crate::entity::Entity;

/// Pick the behavior to run this tick
///
/// Re-sorts the entity's assigned list by catalog priority descending, then
/// takes the first kind whose full condition list evaluates true. Idle is
/// the fallback when nothing qualifies, whether or not it is assigned.
pub fn select_behavior(
    entity: &mut Entity,
    catalog: &[BehaviorSpec],
    ctx: &SelectionCtx,
) -> BehaviorKind {
    let priority_of = |kind: BehaviorKind| -> i32 {
        catalog
            .iter()
            .find(|spec| spec.kind == kind)
            .map(|spec| spec.priority)
            .unwrap_or(0)
    };

    entity
        .behaviors
        .sort_by(|a, b| priority_of(*b).cmp(&priority_of(*a)));

    for index in 0..entity.behaviors.len() {
        let kind = entity.behaviors[index];
        let Some(spec) = catalog.iter().find(|spec| spec.kind == kind) else {
            tracing::warn!("select_behavior: no catalog entry for {kind:?}");
            continue;
        };
        if spec
            .conditions
            .iter()
            .all(|condition| evaluate(condition, entity, ctx))
        {
            return kind;
        }
    }

    BehaviorKind::Idle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::catalog::default_catalog;
    use crate::core::config::EngineConfig;
    use crate::entity::EntityOverrides;

    fn catalog() -> Vec<BehaviorSpec> {
        default_catalog(&EngineConfig::default())
    }

    fn entity(health: f32) -> Entity {
        Entity::with_overrides(EntityOverrides {
            health: Some(health),
            max_health: Some(100.0),
            ..Default::default()
        })
    }

    #[test]
    fn test_flee_preempts_combat_when_both_eligible() {
        let mut subject = entity(10.0);
        let ctx = SelectionCtx { target_distance: Some(5.0) };

        // Ratio 0.1 with a threat at 5 units: Flee (4) and nothing else
        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Flee);
    }

    #[test]
    fn test_combat_preempts_flock_when_healthy() {
        let mut subject = entity(100.0);
        let ctx = SelectionCtx { target_distance: Some(5.0) };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Combat);
    }

    #[test]
    fn test_flock_wins_without_target() {
        let mut subject = entity(100.0);
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Flock);
    }

    #[test]
    fn test_patrol_wins_when_flock_unassigned() {
        let mut subject = entity(100.0);
        subject.behaviors.retain(|kind| *kind != BehaviorKind::Flock);
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Patrol);
    }

    #[test]
    fn test_idle_fallback_when_nothing_qualifies() {
        // Ratio 0.05 with no threat in sight: Combat needs a target, Flee
        // needs one too, Flock and Patrol need health above 0.3
        let mut subject = entity(5.0);
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Idle);
    }

    #[test]
    fn test_idle_fallback_applies_even_when_unassigned() {
        let mut subject = entity(5.0);
        subject.behaviors = vec![BehaviorKind::Combat, BehaviorKind::Flee];
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Idle);
    }

    #[test]
    fn test_exact_boundary_ratio_idles() {
        // At exactly 0.3 Flee wants strictly less, Flock and Patrol want
        // strictly greater; with a distant threat nothing qualifies
        let mut subject = entity(30.0);
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Idle);
    }

    #[test]
    fn test_just_below_boundary_flees_with_threat() {
        let mut subject = entity(29.9);
        let ctx = SelectionCtx { target_distance: Some(10.0) };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Flee);
    }

    #[test]
    fn test_just_above_boundary_flocks() {
        let mut subject = entity(30.1);
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &catalog(), &ctx), BehaviorKind::Flock);
    }

    #[test]
    fn test_selection_sorts_assigned_list_by_priority() {
        let mut subject = entity(100.0);
        subject.behaviors = vec![
            BehaviorKind::Idle,
            BehaviorKind::Patrol,
            BehaviorKind::Combat,
            BehaviorKind::Flee,
            BehaviorKind::Flock,
        ];
        let ctx = SelectionCtx { target_distance: None };

        select_behavior(&mut subject, &catalog(), &ctx);

        assert_eq!(
            subject.behaviors,
            vec![
                BehaviorKind::Flee,
                BehaviorKind::Combat,
                BehaviorKind::Flock,
                BehaviorKind::Patrol,
                BehaviorKind::Idle,
            ]
        );
    }

    #[test]
    fn test_retuned_priority_changes_the_winner() {
        let mut custom = catalog();
        for spec in custom.iter_mut() {
            if spec.kind == BehaviorKind::Patrol {
                spec.priority = 10;
            }
        }

        let mut subject = entity(100.0);
        let ctx = SelectionCtx { target_distance: None };

        assert_eq!(select_behavior(&mut subject, &custom, &ctx), BehaviorKind::Patrol);
    }
}
