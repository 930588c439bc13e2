//! Entity records and their factory defaults

pub mod registry;

pub use registry::Registry;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::behavior::catalog::BehaviorKind;
use crate::core::types::{EntityId, Vec3};

/// Stat baseline captured at creation, the reference point for modifiers
///
/// Modifiers always rescale from these values so repeated application never
/// compounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_health: f32,
    pub speed: f32,
    pub attack_cooldown_ms: f64,
    pub detection_range: f32,
    pub aggression_level: f32,
}

/// A simulated entity
///
/// Invariants: `0 <= health <= max_health`; `path` is consumed
/// front-to-back and may be empty; exactly one behavior executes per entity
/// per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec3,
    /// Facing, radians on the XZ plane
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
    /// Nominal movement speed, world units per second
    pub speed: f32,
    /// Tag of the behavior that ran last tick, informational only
    pub current_behavior: BehaviorKind,
    pub target: Option<EntityId>,
    /// FIFO waypoint queue, consumed front-to-back
    pub path: VecDeque<Vec3>,
    pub aggression_level: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Simulation timestamp of the last attack (ms); negative infinity
    /// until the first attack so a fresh entity may strike immediately
    pub last_attack_ms: f64,
    pub attack_cooldown_ms: f64,
    /// Assigned strategies, scanned by the selector
    pub behaviors: Vec<BehaviorKind>,
    /// Creation-time baseline for modifier rescaling
    pub base: BaseStats,
}

/// Caller-supplied partial for entity creation; unset fields take defaults
#[derive(Debug, Clone, Default)]
pub struct EntityOverrides {
    pub position: Option<Vec3>,
    pub yaw: Option<f32>,
    pub health: Option<f32>,
    pub max_health: Option<f32>,
    pub speed: Option<f32>,
    pub aggression_level: Option<f32>,
    pub detection_range: Option<f32>,
    pub attack_range: Option<f32>,
    pub attack_cooldown_ms: Option<f64>,
    pub target: Option<EntityId>,
    pub behaviors: Option<Vec<BehaviorKind>>,
}

/// Shallow-merge patch for `update_entity`
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub position: Option<Vec3>,
    pub yaw: Option<f32>,
    pub health: Option<f32>,
    pub speed: Option<f32>,
    pub aggression_level: Option<f32>,
    /// `Some(Some(id))` retargets, `Some(None)` clears the target
    pub target: Option<Option<EntityId>>,
}

const DEFAULT_MAX_HEALTH: f32 = 100.0;
const DEFAULT_SPEED: f32 = 3.0;
const DEFAULT_AGGRESSION: f32 = 1.0;
const DEFAULT_DETECTION_RANGE: f32 = 10.0;
const DEFAULT_ATTACK_RANGE: f32 = 2.0;
const DEFAULT_ATTACK_COOLDOWN_MS: f64 = 1000.0;

impl Entity {
    /// Build an entity by merging overrides onto defaults
    ///
    /// Unless overridden, all five catalog behaviors are attached. Health is
    /// clamped into `[0, max_health]`.
    pub fn with_overrides(overrides: EntityOverrides) -> Self {
        let max_health = overrides.max_health.unwrap_or(DEFAULT_MAX_HEALTH);
        let health = overrides.health.unwrap_or(max_health).clamp(0.0, max_health);
        let speed = overrides.speed.unwrap_or(DEFAULT_SPEED);
        let aggression_level = overrides.aggression_level.unwrap_or(DEFAULT_AGGRESSION);
        let detection_range = overrides.detection_range.unwrap_or(DEFAULT_DETECTION_RANGE);
        let attack_cooldown_ms = overrides
            .attack_cooldown_ms
            .unwrap_or(DEFAULT_ATTACK_COOLDOWN_MS);

        Self {
            id: EntityId::new(),
            position: overrides.position.unwrap_or_default(),
            yaw: overrides.yaw.unwrap_or(0.0),
            health,
            max_health,
            speed,
            current_behavior: BehaviorKind::Idle,
            target: overrides.target,
            path: VecDeque::new(),
            aggression_level,
            detection_range,
            attack_range: overrides.attack_range.unwrap_or(DEFAULT_ATTACK_RANGE),
            last_attack_ms: f64::NEG_INFINITY,
            attack_cooldown_ms,
            behaviors: overrides
                .behaviors
                .unwrap_or_else(|| BehaviorKind::ALL.to_vec()),
            base: BaseStats {
                max_health,
                speed,
                attack_cooldown_ms,
                detection_range,
                aggression_level,
            },
        }
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Apply a shallow patch; health is clamped to preserve the invariant
    pub fn apply_patch(&mut self, patch: EntityPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(yaw) = patch.yaw {
            self.yaw = yaw;
        }
        if let Some(health) = patch.health {
            self.health = health.clamp(0.0, self.max_health);
        }
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        if let Some(aggression_level) = patch.aggression_level {
            self.aggression_level = aggression_level;
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
    }
}
