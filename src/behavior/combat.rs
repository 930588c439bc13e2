//! Combat behavior - attack in range, hold a stand-off distance otherwise

use rand::Rng;
use std::f32::consts::TAU;

use crate::behavior::BehaviorCtx;
use crate::core::types::{direction_from_yaw, yaw_toward};
use crate::entity::Entity;
use crate::events::EngineEvent;

/// Per-entity combat state
#[derive(Debug, Clone)]
pub struct CombatState {
    /// Simulation timestamp (ms) of the last stand-off recomputation
    pub last_reposition_ms: f64,
}

impl Default for CombatState {
    fn default() -> Self {
        Self { last_reposition_ms: f64::NEG_INFINITY }
    }
}

pub fn execute(entity: &mut Entity, state: &mut CombatState, ctx: &mut BehaviorCtx) {
    let Some(target_id) = entity.target else {
        return;
    };
    // Unresolvable target degrades to a no-op rather than an error
    let Some(target_pos) = ctx.resolve_position(target_id) else {
        return;
    };

    let distance = entity.position.distance(&target_pos);

    // In range and off cooldown: strike and stop there for this tick
    if distance <= entity.attack_range
        && ctx.now_ms - entity.last_attack_ms > entity.attack_cooldown_ms
    {
        entity.last_attack_ms = ctx.now_ms;
        entity.yaw = yaw_toward(&entity.position, &target_pos);
        let direction = (target_pos - entity.position).normalize();
        ctx.bus.publish(EngineEvent::Attack {
            attacker: entity.id,
            target: target_id,
            position: entity.position,
            direction,
        });
        return;
    }

    // Reposition at most every reposition_cooldown_ms
    if ctx.now_ms - state.last_reposition_ms >= ctx.config.reposition_cooldown_ms {
        state.last_reposition_ms = ctx.now_ms;

        // Higher aggression stands closer to melee
        let aggression = entity.aggression_level.clamp(0.0, 1.0);
        let ideal = ctx.config.melee_distance
            + (entity.attack_range - ctx.config.melee_distance) * (1.0 - aggression);

        let away = (entity.position - target_pos).normalize();
        let lateral_angle = ctx.rng.gen::<f32>() * TAU;
        let lateral =
            direction_from_yaw(lateral_angle) * (ideal * ctx.config.lateral_offset_factor);
        let stand_off = target_pos + away * ideal + lateral;

        if stand_off.distance(&entity.position) > ctx.config.reposition_threshold {
            let path = ctx.pathfinder.find_path(entity.position, stand_off);
            if !path.is_empty() {
                entity.path = path.into();
            }
        }
    }

    // Never stand around pathless while a target is live
    if entity.path.is_empty() {
        entity.path = ctx.pathfinder.find_path(entity.position, target_pos).into();
    }
}
