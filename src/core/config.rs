//! Engine configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use serde::Deserialize;

use crate::core::error::Result;

/// Configuration for the behavior engine
///
/// These values have been tuned to produce good emergent behavior.
/// Changing them will affect pacing and feel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === IDLE ===
    /// Lower bound of the idle re-roll timer (ms)
    ///
    /// Each time the timer expires the entity decides again whether to
    /// wander. Shorter = fidgety entities.
    pub min_idle_time_ms: f64,

    /// Upper bound of the idle re-roll timer (ms)
    pub max_idle_time_ms: f64,

    /// How far a wandering entity may pick its waypoint (world units)
    pub wander_radius: f32,

    /// Chance per re-roll that an idle entity wanders at all
    pub wander_chance: f32,

    /// Chance per execute that an idle entity snaps to a random facing
    pub glance_chance: f32,

    /// Idle movement runs at this fraction of nominal speed
    pub idle_speed_factor: f32,

    // === PATROL ===
    /// Distance at which a patrol waypoint counts as reached (world units)
    pub waypoint_threshold: f32,

    // === COMBAT ===
    /// A target beyond this distance disqualifies combat entirely
    /// (world units)
    ///
    /// This is intentionally larger than any default detection_range so
    /// entities already in a fight don't give up the moment the target
    /// steps outside perception.
    pub combat_gate_range: f32,

    /// Distance regarded as melee when interpolating stand-off range
    pub melee_distance: f32,

    /// Minimum time between stand-off recomputations (ms)
    ///
    /// Repositioning every tick makes entities orbit their target.
    /// 3000ms keeps movement purposeful.
    pub reposition_cooldown_ms: f64,

    /// A recomputed stand-off point closer than this to the current
    /// position is not worth pathing to (world units)
    pub reposition_threshold: f32,

    /// Lateral offset applied to the stand-off point, as a fraction of the
    /// ideal distance
    ///
    /// Spreads attackers around the target instead of stacking them on
    /// one approach vector.
    pub lateral_offset_factor: f32,

    // === FLEE ===
    /// A threat within this distance makes a wounded entity eligible to
    /// flee (world units)
    pub threat_range: f32,

    /// Distance from the threat at which an entity counts as safe
    /// (world units)
    pub safe_distance: f32,

    /// Minimum time between flee path recomputations (ms)
    pub path_update_interval_ms: f64,

    /// Fleeing entities move at this multiple of nominal speed
    pub flee_speed_factor: f32,

    // === FLOCKING ===
    /// Neighbor gathering radius for steering (world units)
    pub flock_radius: f32,

    /// Neighbors closer than this push back via separation (world units)
    ///
    /// Must be well below flock_radius or separation dominates cohesion
    /// and the flock never converges.
    pub separation_radius: f32,

    /// Magnitude cap on the combined steering force per tick
    pub max_force: f32,

    /// Steering component weights
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,

    // === MOVEMENT ===
    /// Distance at which a path waypoint counts as consumed for
    /// non-patrol movement (world units)
    pub arrive_threshold: f32,

    /// Yaw interpolation rates (per second of dt)
    ///
    /// Idle turns lazily, purposeful movement turns quickly, flight
    /// snaps around fastest.
    pub idle_yaw_rate: f32,
    pub move_yaw_rate: f32,
    pub flee_yaw_rate: f32,

    // === EVENTS ===
    /// Maximum number of published events retained in the bus history
    pub event_history_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Idle: 2-5s between decisions, 30% wander, 5% glance
            min_idle_time_ms: 2000.0,
            max_idle_time_ms: 5000.0,
            wander_radius: 3.0,
            wander_chance: 0.3,
            glance_chance: 0.05,
            idle_speed_factor: 0.5,

            // Patrol
            waypoint_threshold: 1.0,

            // Combat
            combat_gate_range: 20.0,
            melee_distance: 1.0,
            reposition_cooldown_ms: 3000.0,
            reposition_threshold: 2.0,
            lateral_offset_factor: 0.3,

            // Flee
            threat_range: 15.0,
            safe_distance: 30.0,
            path_update_interval_ms: 500.0,
            flee_speed_factor: 1.5,

            // Flocking
            flock_radius: 10.0,
            separation_radius: 3.0,
            max_force: 0.05,
            cohesion_weight: 1.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,

            // Movement
            arrive_threshold: 0.5,
            idle_yaw_rate: 2.0,
            move_yaw_rate: 5.0,
            flee_yaw_rate: 8.0,

            // Events
            event_history_cap: 1024,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys fall back to defaults
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_idle_time_ms > self.max_idle_time_ms {
            return Err(format!(
                "min_idle_time_ms ({}) should be <= max_idle_time_ms ({})",
                self.min_idle_time_ms, self.max_idle_time_ms
            ));
        }

        if self.separation_radius >= self.flock_radius {
            return Err(format!(
                "separation_radius ({}) should be < flock_radius ({})",
                self.separation_radius, self.flock_radius
            ));
        }

        if self.safe_distance <= self.threat_range {
            return Err(format!(
                "safe_distance ({}) should be > threat_range ({})",
                self.safe_distance, self.threat_range
            ));
        }

        if !(0.0..=1.0).contains(&self.wander_chance) || !(0.0..=1.0).contains(&self.glance_chance) {
            return Err("wander_chance and glance_chance must be within [0, 1]".into());
        }

        if self.max_force <= 0.0 {
            return Err("max_force must be positive".into());
        }

        Ok(())
    }
}
