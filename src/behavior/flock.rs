//! Flocking behavior - cohesion, separation, and alignment steering

use crate::behavior::BehaviorCtx;
use crate::core::config::EngineConfig;
use crate::core::types::Vec3;
use crate::entity::Entity;

/// Flocking keeps no per-entity state; the steering force is recomputed
/// from the neighborhood every execute
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockState;

/// The three steering components, exposed separately for testing
#[derive(Debug, Clone, Copy, Default)]
pub struct SteeringForces {
    pub cohesion: Vec3,
    pub separation: Vec3,
    pub alignment: Vec3,
}

impl SteeringForces {
    pub fn combined(&self, config: &EngineConfig) -> Vec3 {
        let force = self.cohesion * config.cohesion_weight
            + self.separation * config.separation_weight
            + self.alignment * config.alignment_weight;
        force.clamp_length(config.max_force)
    }
}

/// Neighbor view needed by the steering math
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub position: Vec3,
    /// Normalized direction of the neighbor's first path segment, if any
    pub path_dir: Option<Vec3>,
}

/// Compute the three steering components for `position` among `neighbors`
///
/// All divisions are guarded by neighbor counts; an empty neighborhood
/// yields zero forces.
pub fn steering(position: Vec3, neighbors: &[Neighbor], config: &EngineConfig) -> SteeringForces {
    if neighbors.is_empty() {
        return SteeringForces::default();
    }

    // Cohesion: toward the neighbor centroid
    let mut centroid = Vec3::default();
    for neighbor in neighbors {
        centroid = centroid + neighbor.position;
    }
    centroid = centroid * (1.0 / neighbors.len() as f32);
    let cohesion = (centroid - position).normalize();

    // Separation: push off neighbors inside the separation radius,
    // weighted by inverse distance
    let mut separation = Vec3::default();
    let mut crowding = 0usize;
    for neighbor in neighbors {
        let distance = position.distance(&neighbor.position);
        if distance < config.separation_radius && distance > 0.0001 {
            separation = separation + (position - neighbor.position).normalize() * (1.0 / distance);
            crowding += 1;
        }
    }
    if crowding > 0 {
        separation = separation.normalize();
    }

    // Alignment: average heading of neighbors that are going somewhere
    let mut alignment = Vec3::default();
    let mut moving = 0usize;
    for neighbor in neighbors {
        if let Some(dir) = neighbor.path_dir {
            alignment = alignment + dir;
            moving += 1;
        }
    }
    if moving > 0 {
        alignment = (alignment * (1.0 / moving as f32)).normalize();
    }

    SteeringForces { cohesion, separation, alignment }
}

pub fn execute(entity: &mut Entity, ctx: &mut BehaviorCtx) {
    let neighbors: Vec<Neighbor> = ctx
        .snapshot
        .iter()
        .filter(|snap| snap.id != entity.id)
        .filter(|snap| entity.position.distance(&snap.position) <= ctx.config.flock_radius)
        .map(|snap| Neighbor { position: snap.position, path_dir: snap.path_dir })
        .collect();

    if neighbors.is_empty() {
        return;
    }

    let force = steering(entity.position, &neighbors, ctx.config).combined(ctx.config);

    entity.path.clear();
    entity.path.push_back(entity.position + force);
}
