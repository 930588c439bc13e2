//! Property tests for the steering math

use proptest::prelude::*;

use packmind::behavior::flock::{steering, Neighbor};
use packmind::core::config::EngineConfig;
use packmind::core::types::Vec3;

fn neighbor_strategy() -> impl Strategy<Value = Neighbor> {
    (
        -20.0f32..20.0,
        -20.0f32..20.0,
        prop::option::of((-1.0f32..1.0, -1.0f32..1.0)),
    )
        .prop_map(|(x, z, heading)| Neighbor {
            position: Vec3::new(x, 0.0, z),
            path_dir: heading.map(|(hx, hz)| Vec3::new(hx, 0.0, hz).normalize()),
        })
}

proptest! {
    /// The combined force never exceeds the configured cap, whatever the
    /// neighborhood looks like.
    #[test]
    fn combined_force_never_exceeds_cap(
        neighbors in prop::collection::vec(neighbor_strategy(), 0..12)
    ) {
        let config = EngineConfig::default();
        let force = steering(Vec3::default(), &neighbors, &config).combined(&config);
        prop_assert!(force.length() <= config.max_force + 1e-6);
    }

    /// Every component of the steering triple is a unit vector or zero;
    /// normalization guards never divide by nothing.
    #[test]
    fn components_are_unit_or_zero(
        neighbors in prop::collection::vec(neighbor_strategy(), 0..12)
    ) {
        let config = EngineConfig::default();
        let forces = steering(Vec3::default(), &neighbors, &config);

        for component in [forces.cohesion, forces.separation, forces.alignment] {
            let len = component.length();
            prop_assert!(len <= 1.0 + 1e-5);
            prop_assert!(len.is_finite());
        }
    }

    /// A lone neighbor outside the separation radius never produces a
    /// separation push.
    #[test]
    fn separation_silent_outside_radius(distance in 3.0f32..20.0) {
        let config = EngineConfig::default();
        let neighbors = [Neighbor {
            position: Vec3::new(distance, 0.0, 0.0),
            path_dir: None,
        }];
        let forces = steering(Vec3::default(), &neighbors, &config);
        prop_assert_eq!(forces.separation.length(), 0.0);
    }

    /// Inside the radius, separation always points away from the neighbor.
    #[test]
    fn separation_points_away_inside_radius(distance in 0.1f32..2.9) {
        let config = EngineConfig::default();
        let neighbors = [Neighbor {
            position: Vec3::new(distance, 0.0, 0.0),
            path_dir: None,
        }];
        let forces = steering(Vec3::default(), &neighbors, &config);
        prop_assert!(forces.separation.x < 0.0);
    }
}
