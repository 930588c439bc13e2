//! Idle behavior - wander aimlessly, glance around
//!
//! The fallback strategy: no conditions, lowest priority. Keeps a re-roll
//! timer and occasionally picks a short wander waypoint near the current
//! position.

use rand::Rng;
use std::f32::consts::TAU;

use crate::behavior::BehaviorCtx;
use crate::core::types::direction_from_yaw;
use crate::entity::Entity;

/// Per-entity idle state
#[derive(Debug, Clone, Default)]
pub struct IdleState {
    /// Absolute simulation time (ms) of the next wander decision
    pub next_roll_ms: Option<f64>,
}

pub fn execute(entity: &mut Entity, state: &mut IdleState, ctx: &mut BehaviorCtx) {
    let due = match state.next_roll_ms {
        None => true,
        Some(at) => ctx.now_ms >= at,
    };

    if due {
        let interval = ctx
            .rng
            .gen_range(ctx.config.min_idle_time_ms..=ctx.config.max_idle_time_ms);
        state.next_roll_ms = Some(ctx.now_ms + interval);

        if ctx.rng.gen::<f32>() < ctx.config.wander_chance {
            let angle = ctx.rng.gen::<f32>() * TAU;
            let distance = ctx.rng.gen::<f32>() * ctx.config.wander_radius;
            let waypoint = entity.position + direction_from_yaw(angle) * distance;
            entity.path.clear();
            entity.path.push_back(waypoint);
        }
    }

    // Occasional glance, independent of the wander timer
    if ctx.rng.gen::<f32>() < ctx.config.glance_chance {
        entity.yaw = ctx.rng.gen::<f32>() * TAU;
    }
}
