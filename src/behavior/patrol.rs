//! Patrol behavior - walk an externally supplied waypoint loop

use crate::behavior::BehaviorCtx;
use crate::core::types::Vec3;
use crate::entity::Entity;

/// Per-entity patrol state: the route and where the entity is on it
#[derive(Debug, Clone, Default)]
pub struct PatrolState {
    /// Ordered waypoint loop, supplied by the host
    pub route: Vec<Vec3>,
    /// Index of the waypoint currently being walked toward
    pub index: usize,
}

impl PatrolState {
    pub fn with_route(route: Vec<Vec3>) -> Self {
        Self { route, index: 0 }
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        if self.route.is_empty() {
            None
        } else {
            Some(self.route[self.index % self.route.len()])
        }
    }
}

pub fn execute(entity: &mut Entity, state: &mut PatrolState, ctx: &mut BehaviorCtx) {
    let Some(waypoint) = state.current_waypoint() else {
        return;
    };

    if entity.position.distance(&waypoint) <= ctx.config.waypoint_threshold {
        state.index = (state.index + 1) % state.route.len();
    } else {
        let path = ctx.pathfinder.find_path(entity.position, waypoint);
        if !path.is_empty() {
            entity.path = path.into();
        }
    }
}
