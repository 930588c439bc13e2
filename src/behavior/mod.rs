//! Behavior strategies and their shared plumbing
//!
//! Each strategy is a pair of free functions, `execute` and `update`, over
//! the entity, its per-entity behavior state, and the tick context. State
//! lives in the simulation's arena keyed by `(EntityId, BehaviorKind)`, so
//! two entities running the same strategy never share timers or indices.

pub mod catalog;
pub mod combat;
pub mod conditions;
pub mod flee;
pub mod flock;
pub mod idle;
pub mod patrol;

use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::core::types::{lerp_yaw, EntityId, Vec3};
use crate::entity::Entity;
use crate::events::EventBus;
use crate::path::Pathfinder;

/// Read-only view of one entity taken at the start of the tick
///
/// Behaviors resolve other entities (targets, neighbors) against this
/// snapshot rather than live records, so mid-tick mutation and removal
/// cannot race the resolution.
#[derive(Debug, Clone, Copy)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Vec3,
    /// Normalized direction toward the entity's first path waypoint, if any
    pub path_dir: Option<Vec3>,
}

impl EntitySnapshot {
    pub fn of(entity: &Entity) -> Self {
        let path_dir = entity.path.front().map(|waypoint| (*waypoint - entity.position).normalize());
        Self {
            id: entity.id,
            position: entity.position,
            path_dir,
        }
    }
}

/// Everything a behavior's `execute` step may touch besides the entity
pub struct BehaviorCtx<'a> {
    pub now_ms: f64,
    pub config: &'a EngineConfig,
    pub snapshot: &'a [EntitySnapshot],
    pub pathfinder: &'a dyn Pathfinder,
    pub rng: &'a mut ChaCha8Rng,
    pub bus: &'a mut EventBus,
}

impl BehaviorCtx<'_> {
    /// Position of another entity as of the start of this tick
    pub fn resolve_position(&self, id: EntityId) -> Option<Vec3> {
        self.snapshot
            .iter()
            .find(|snap| snap.id == id)
            .map(|snap| snap.position)
    }
}

/// Per-entity strategy state, one arena slot per `(EntityId, BehaviorKind)`
#[derive(Debug, Clone)]
pub enum BehaviorState {
    Idle(idle::IdleState),
    Patrol(patrol::PatrolState),
    Flock(flock::FlockState),
    Combat(combat::CombatState),
    Flee(flee::FleeState),
}

impl BehaviorState {
    pub fn for_kind(kind: catalog::BehaviorKind) -> Self {
        match kind {
            catalog::BehaviorKind::Idle => BehaviorState::Idle(idle::IdleState::default()),
            catalog::BehaviorKind::Patrol => BehaviorState::Patrol(patrol::PatrolState::default()),
            catalog::BehaviorKind::Flock => BehaviorState::Flock(flock::FlockState::default()),
            catalog::BehaviorKind::Combat => BehaviorState::Combat(combat::CombatState::default()),
            catalog::BehaviorKind::Flee => BehaviorState::Flee(flee::FleeState::default()),
        }
    }
}

/// Dispatch a strategy's `execute` step
pub fn execute(entity: &mut Entity, state: &mut BehaviorState, ctx: &mut BehaviorCtx) {
    match state {
        BehaviorState::Idle(idle_state) => idle::execute(entity, idle_state, ctx),
        BehaviorState::Patrol(patrol_state) => patrol::execute(entity, patrol_state, ctx),
        BehaviorState::Flock(_) => flock::execute(entity, ctx),
        BehaviorState::Combat(combat_state) => combat::execute(entity, combat_state, ctx),
        BehaviorState::Flee(flee_state) => flee::execute(entity, flee_state, ctx),
    }
}

/// Dispatch a strategy's `update` (movement integration) step
pub fn update(entity: &mut Entity, state: &BehaviorState, dt: f32, config: &EngineConfig) {
    match state {
        BehaviorState::Idle(_) => follow_path(
            entity,
            dt,
            config.idle_speed_factor,
            config.idle_yaw_rate,
            config.arrive_threshold,
        ),
        BehaviorState::Patrol(_) => follow_path(
            entity,
            dt,
            1.0,
            config.move_yaw_rate,
            config.waypoint_threshold,
        ),
        BehaviorState::Flock(_) => {
            // Steering rewrites the waypoint every execute; no reach
            // threshold or the tiny force offsets get dropped unwalked
            follow_path(entity, dt, 1.0, config.move_yaw_rate, 0.0)
        }
        BehaviorState::Combat(_) => follow_path(
            entity,
            dt,
            1.0,
            config.move_yaw_rate,
            config.arrive_threshold,
        ),
        BehaviorState::Flee(_) => follow_path(
            entity,
            dt,
            config.flee_speed_factor,
            config.flee_yaw_rate,
            config.arrive_threshold,
        ),
    }
}

/// Advance the entity toward its path head, consuming reached waypoints
///
/// One integration step: move `speed * speed_factor * dt` toward the front
/// waypoint, interpolate yaw toward the travel direction at `yaw_rate * dt`,
/// and pop the waypoint once within `reach_threshold` (or when the step
/// overshoots it).
pub fn follow_path(
    entity: &mut Entity,
    dt: f32,
    speed_factor: f32,
    yaw_rate: f32,
    reach_threshold: f32,
) {
    let Some(&waypoint) = entity.path.front() else {
        return;
    };

    let to_waypoint = waypoint - entity.position;
    let distance = to_waypoint.length();

    if distance <= reach_threshold {
        entity.path.pop_front();
        return;
    }

    let direction = to_waypoint.normalize();
    let target_yaw = direction.x.atan2(direction.z);
    entity.yaw = lerp_yaw(entity.yaw, target_yaw, yaw_rate * dt);

    let step = entity.speed * speed_factor * dt;
    if step >= distance {
        entity.position = waypoint;
        entity.path.pop_front();
    } else {
        entity.position = entity.position + direction * step;
    }
}
