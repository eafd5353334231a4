//! Planar geometry helpers shared by the shape and ornament generators.
//!
//! Planar points are `DVec2` where `.x` is the local X axis and `.y` is the
//! local Z axis. Elevation is only introduced when a point is snapped onto the
//! surface (see [`crate::elevation::snap_to_surface`]).

use glam::DVec2;
use std::f64::consts::TAU;

/// Points closer than this are treated as the same vertex.
pub const VERTEX_EPSILON: f64 = 1e-9;

/// Point at `angle` radians and `radius` from the origin.
pub fn polar(angle: f64, radius: f64) -> DVec2 {
    DVec2::new(angle.cos() * radius, angle.sin() * radius)
}

/// Angle of sample `index` out of `count` evenly spaced samples.
pub fn even_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    index as f64 / count as f64 * TAU
}

/// Yaw (rotation about the vertical axis) that turns `from` to face `to`.
///
/// Yaw 0 faces +Z.
pub fn yaw_towards(from: DVec2, to: DVec2) -> f64 {
    let dir = to - from;
    dir.x.atan2(dir.y)
}

/// Append the first point if the ring is not already closed.
pub fn close_ring(points: &mut Vec<DVec2>) {
    if let Some(&first) = points.first() {
        if !is_closed(points) {
            points.push(first);
        }
    }
}

/// Whether the first and last points coincide.
pub fn is_closed(points: &[DVec2]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => {
            first.distance(*last) <= VERTEX_EPSILON
        }
        _ => false,
    }
}

/// Number of distinct vertices in a ring, ignoring the closing duplicate.
pub fn distinct_vertex_count(points: &[DVec2]) -> usize {
    let mut distinct: Vec<DVec2> = Vec::with_capacity(points.len());
    for point in points {
        if !distinct.iter().any(|p| p.distance(*point) <= VERTEX_EPSILON) {
            distinct.push(*point);
        }
    }
    distinct.len()
}

/// Even-odd point-in-polygon test. The ring may be open or closed.
pub fn contains(points: &[DVec2], p: DVec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Largest distance from the origin to any vertex.
pub fn max_radius(points: &[DVec2]) -> f64 {
    points.iter().map(|p| p.length()).fold(0.0, f64::max)
}

/// Whether every coordinate is finite.
pub fn all_finite(points: &[DVec2]) -> bool {
    points.iter().all(|p| p.is_finite())
}

/// Unit vector perpendicular to `dir` (rotated +90°).
pub fn perpendicular(dir: DVec2) -> DVec2 {
    DVec2::new(-dir.y, dir.x)
}
