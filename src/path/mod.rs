//! Pathfinding gateway contract
//!
//! Path computation itself lives outside the engine; behaviors only consume
//! this request/response interface. An empty result means "unreachable this
//! tick" and callers retry on a later cycle.

use crate::core::types::Vec3;

/// External path provider
pub trait Pathfinder {
    /// Ordered waypoints from origin to destination, possibly empty if
    /// unreachable. Must be cheap and idempotent: behaviors re-request
    /// whenever their path runs empty.
    fn find_path(&self, origin: Vec3, destination: Vec3) -> Vec<Vec3>;
}

/// Straight-line provider: a single waypoint at the destination
///
/// Reference implementation for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectPathfinder;

impl Pathfinder for DirectPathfinder {
    fn find_path(&self, _origin: Vec3, destination: Vec3) -> Vec<Vec3> {
        vec![destination]
    }
}

/// Provider that never finds a path; exercises the empty-path retry rules
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachablePathfinder;

impl Pathfinder for UnreachablePathfinder {
    fn find_path(&self, _origin: Vec3, _destination: Vec3) -> Vec<Vec3> {
        Vec::new()
    }
}
