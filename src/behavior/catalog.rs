//! Behavior catalog - kinds, default priorities, and eligibility conditions

use serde::{Deserialize, Serialize};

use crate::behavior::conditions::{Comparison, Condition, ConditionKind};
use crate::core::config::EngineConfig;

/// Strategy tag, one per behavior implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    Idle,
    Patrol,
    Flock,
    Combat,
    Flee,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 5] = [
        BehaviorKind::Idle,
        BehaviorKind::Patrol,
        BehaviorKind::Flock,
        BehaviorKind::Combat,
        BehaviorKind::Flee,
    ];
}

/// Health ratio below which an entity is willing to flee; also the point
/// where inbound damage force-assigns the Flee behavior
pub const FLEE_HEALTH_RATIO: f32 = 0.3;

/// Health ratio below which an entity no longer fights back
pub const COMBAT_MIN_HEALTH_RATIO: f32 = 0.1;

/// Catalog entry: priority plus the AND-combined eligibility conditions
///
/// Priorities are data, not constants; hosts may retune them through the
/// simulation's catalog accessor.
#[derive(Debug, Clone)]
pub struct BehaviorSpec {
    pub kind: BehaviorKind,
    pub priority: i32,
    pub conditions: Vec<Condition>,
}

/// Build the default catalog from engine tuning
///
/// Idle carries no conditions and is therefore always eligible, which is
/// what makes it the fallback of the priority scan.
pub fn default_catalog(config: &EngineConfig) -> Vec<BehaviorSpec> {
    vec![
        BehaviorSpec {
            kind: BehaviorKind::Idle,
            priority: 0,
            conditions: vec![],
        },
        BehaviorSpec {
            kind: BehaviorKind::Patrol,
            priority: 1,
            conditions: vec![
                Condition::new(ConditionKind::TargetClear, Comparison::Greater, 0.0),
                Condition::new(ConditionKind::HealthRatio, Comparison::Greater, FLEE_HEALTH_RATIO),
            ],
        },
        BehaviorSpec {
            kind: BehaviorKind::Flock,
            priority: 2,
            conditions: vec![Condition::new(
                ConditionKind::HealthRatio,
                Comparison::Greater,
                FLEE_HEALTH_RATIO,
            )],
        },
        BehaviorSpec {
            kind: BehaviorKind::Combat,
            priority: 3,
            conditions: vec![
                Condition::new(
                    ConditionKind::TargetDistance,
                    Comparison::LessEq,
                    config.combat_gate_range,
                ),
                Condition::new(ConditionKind::HealthRatio, Comparison::Greater, COMBAT_MIN_HEALTH_RATIO),
            ],
        },
        BehaviorSpec {
            kind: BehaviorKind::Flee,
            priority: 4,
            conditions: vec![
                Condition::new(ConditionKind::HealthRatio, Comparison::Less, FLEE_HEALTH_RATIO),
                Condition::new(
                    ConditionKind::TargetDistance,
                    Comparison::LessEq,
                    config.threat_range,
                ),
            ],
        },
    ]
}
