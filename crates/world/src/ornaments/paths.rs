//! Paths: waypoint polylines running from the interior out toward buildings.

use crate::geometry::{all_finite, perpendicular, polar, yaw_towards};
use crate::ornaments::buildings::{plan_buildings, RING_RADIUS};
use crate::ornaments::placement::PlacementContext;
use crate::ornaments::{OrnamentCategory, OrnamentDetail, OrnamentInstance, PlacementError};
use crate::streams;
use glam::{DVec2, DVec3};

/// Waypoints per path, including both ends.
pub const WAYPOINTS: usize = 5;
/// Radius of the first waypoint as a fraction of size.
pub const START_RADIUS: f64 = 0.15;
/// Sideways wobble of inner waypoints as a fraction of size.
pub const WOBBLE: f64 = 0.05;

pub fn place_paths(
    ctx: &PlacementContext<'_>,
    count: u32,
    building_count: u32,
) -> Vec<Result<OrnamentInstance, PlacementError>> {
    let mut rng = ctx.stream(streams::PATHS);
    let targets: Vec<f64> = plan_buildings(ctx, building_count)
        .iter()
        .map(|slot| slot.angle)
        .collect();
    let size = ctx.size();
    let end_radius = size * RING_RADIUS * 0.9;

    (0..count as usize)
        .map(|i| {
            let variant_seed = ctx.variant_seed(streams::PATHS, i);
            let angle = match targets.get(i % targets.len().max(1)) {
                Some(angle) => *angle,
                None => rng.next_angle(),
            };
            let width = size * rng.next_float(0.04, 0.07);

            let direction = polar(angle, 1.0);
            let side = perpendicular(direction);
            let start_radius = size * START_RADIUS;
            let mut planar_points = Vec::with_capacity(WAYPOINTS);
            for step in 0..WAYPOINTS {
                let t = step as f64 / (WAYPOINTS - 1) as f64;
                let along = start_radius + (end_radius - start_radius) * t;
                let wobble = if step == 0 || step == WAYPOINTS - 1 {
                    0.0
                } else {
                    size * rng.next_signed(WOBBLE)
                };
                planar_points.push(direction * along + side * wobble);
            }

            if !all_finite(&planar_points) {
                return Err(PlacementError::InvalidGeometry {
                    category: OrnamentCategory::Path,
                    at: DVec2::ZERO,
                    variant_seed,
                    reason: "non-finite waypoint".to_string(),
                });
            }

            let waypoints: Vec<DVec3> = planar_points.iter().map(|p| ctx.snap(*p)).collect();
            let midpoint = planar_points[WAYPOINTS / 2];
            Ok(OrnamentInstance {
                category: OrnamentCategory::Path,
                position: ctx.snap(midpoint),
                rotation: yaw_towards(DVec2::ZERO, direction),
                scale: 1.0,
                variant_seed,
                tint: ctx.tint(OrnamentCategory::Path),
                detail: OrnamentDetail::Path { waypoints, width },
            })
        })
        .collect()
}
