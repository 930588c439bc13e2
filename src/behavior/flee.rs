//! Flee behavior - sprint away from a threat until a safe distance opens up

use rand::Rng;
use std::f32::consts::FRAC_PI_4;

use crate::behavior::BehaviorCtx;
use crate::core::types::{direction_from_yaw, Vec3};
use crate::entity::Entity;
use crate::events::EngineEvent;

/// Per-entity flee state
#[derive(Debug, Clone)]
pub struct FleeState {
    /// Position where the flight started; `Some` while a flight is active
    pub start_position: Option<Vec3>,
    /// Simulation timestamp (ms) of the last escape-path recomputation
    pub last_path_update_ms: f64,
}

impl Default for FleeState {
    fn default() -> Self {
        Self {
            start_position: None,
            last_path_update_ms: f64::NEG_INFINITY,
        }
    }
}

pub fn execute(entity: &mut Entity, state: &mut FleeState, ctx: &mut BehaviorCtx) {
    if state.start_position.is_none() {
        state.start_position = Some(entity.position);
        ctx.bus.publish(EngineEvent::FleeStart {
            id: entity.id,
            position: entity.position,
        });
    }

    let threat_pos = entity.target.and_then(|id| ctx.resolve_position(id));

    // An unresolvable threat counts as escaped
    let safe = match threat_pos {
        None => true,
        Some(threat) => entity.position.distance(&threat) >= ctx.config.safe_distance,
    };

    if safe {
        ctx.bus.publish(EngineEvent::FleeComplete { id: entity.id });
        *state = FleeState::default();
        return;
    }

    let Some(threat) = threat_pos else {
        return;
    };

    if ctx.now_ms - state.last_path_update_ms >= ctx.config.path_update_interval_ms {
        state.last_path_update_ms = ctx.now_ms;

        // 8 jittered candidate directions at 45-degree increments; take the
        // first that opens safe distance from the threat
        for step in 0..8 {
            let angle = step as f32 * FRAC_PI_4 + ctx.rng.gen::<f32>() * FRAC_PI_4;
            let candidate =
                entity.position + direction_from_yaw(angle) * ctx.config.safe_distance;
            if candidate.distance(&threat) >= ctx.config.safe_distance {
                let path = ctx.pathfinder.find_path(entity.position, candidate);
                if !path.is_empty() {
                    entity.path = path.into();
                }
                break;
            }
        }
    }
}
