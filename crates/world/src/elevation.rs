//! Terrain elevation model.
//!
//! Converts a planar offset into a surface height using an archetype-specific
//! radial profile. The function is total: any input, including NaN and
//! infinities, yields a finite height.

use crate::archetype::Archetype;
use glam::{DVec2, DVec3};
use std::f64::consts::FRAC_PI_2;

/// Normalized radius at which the mountain ridge peaks.
pub const RIDGE_CREST: f64 = 0.7;

/// Normalized distance over which the ridge falls back to zero.
const RIDGE_FALLOFF: f64 = 0.5;

/// Radial height profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReliefProfile {
    /// Inverted quadratic dome, highest at the center.
    Dome,
    /// Quadratic rise to [`RIDGE_CREST`], then quadratic fall.
    Ridge,
    /// Quarter-sine hump, flat-topped near the center.
    SineHump,
}

/// Profile and amplitude (fraction of size) for an archetype.
pub const fn relief(archetype: Archetype) -> (ReliefProfile, f64) {
    match archetype {
        Archetype::Mountains => (ReliefProfile::Ridge, 0.35),
        Archetype::Forest => (ReliefProfile::SineHump, 0.18),
        Archetype::Mainland => (ReliefProfile::Dome, 0.15),
        Archetype::Island => (ReliefProfile::Dome, 0.12),
        Archetype::Peninsula => (ReliefProfile::Dome, 0.12),
        Archetype::Archipelago => (ReliefProfile::Dome, 0.10),
        Archetype::Desert => (ReliefProfile::Dome, 0.08),
    }
}

/// Surface height at local `(x, z)`.
pub fn height(x: f64, z: f64, archetype: Archetype, size: f64) -> f64 {
    if !(size.is_finite() && size > 0.0) {
        return 0.0;
    }
    let distance = x.hypot(z) / size;
    if !distance.is_finite() {
        return 0.0;
    }
    let (profile, amplitude) = relief(archetype);
    size * amplitude * profile_value(profile, distance)
}

/// Unit-amplitude profile value at normalized distance `d >= 0`.
fn profile_value(profile: ReliefProfile, d: f64) -> f64 {
    match profile {
        ReliefProfile::Dome => (1.0 - d * d).max(0.0),
        ReliefProfile::Ridge => {
            if d < RIDGE_CREST {
                let t = d / RIDGE_CREST;
                t * t
            } else {
                let t = ((d - RIDGE_CREST) / RIDGE_FALLOFF).min(1.0);
                1.0 - t * t
            }
        }
        ReliefProfile::SineHump => {
            let t = (1.0 - d).clamp(0.0, 1.0);
            (t * FRAC_PI_2).sin()
        }
    }
}

/// Lift a planar point onto the surface.
pub fn snap_to_surface(planar: DVec2, archetype: Archetype, size: f64) -> DVec3 {
    DVec3::new(
        planar.x,
        height(planar.x, planar.y, archetype, size),
        planar.y,
    )
}

/// Whether `point` sits on the surface within `tolerance`.
pub fn is_on_surface(point: DVec3, archetype: Archetype, size: f64, tolerance: f64) -> bool {
    (point.y - height(point.x, point.z, archetype, size)).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dome_peaks_at_center_and_vanishes_at_rim() {
        let size = 10.0;
        let center = height(0.0, 0.0, Archetype::Mainland, size);
        assert!((center - 1.5).abs() < 1e-12);
        assert_eq!(height(10.0, 0.0, Archetype::Mainland, size), 0.0);
        assert_eq!(height(30.0, 0.0, Archetype::Mainland, size), 0.0);
        assert!(height(5.0, 0.0, Archetype::Mainland, size) < center);
    }

    #[test]
    fn ridge_rises_to_crest_then_falls() {
        let size = 10.0;
        let crest = height(7.0, 0.0, Archetype::Mountains, size);
        assert!((crest - 3.5).abs() < 1e-9);
        assert_eq!(height(0.0, 0.0, Archetype::Mountains, size), 0.0);
        assert!(height(3.5, 0.0, Archetype::Mountains, size) < crest);
        assert!(height(10.0, 0.0, Archetype::Mountains, size) < crest);
        assert_eq!(height(12.0, 0.0, Archetype::Mountains, size), 0.0);
    }

    #[test]
    fn ridge_is_continuous_at_crest() {
        let size = 1.0;
        let below = height(RIDGE_CREST - 1e-9, 0.0, Archetype::Mountains, size);
        let above = height(RIDGE_CREST + 1e-9, 0.0, Archetype::Mountains, size);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn forest_hump_is_monotone_outward() {
        let size = 8.0;
        let mut previous = f64::INFINITY;
        for step in 0..=10 {
            let h = height(step as f64 * 0.8, 0.0, Archetype::Forest, size);
            assert!(h <= previous + 1e-12);
            previous = h;
        }
    }

    #[test]
    fn height_is_total() {
        for archetype in Archetype::ALL {
            for (x, z, size) in [
                (f64::NAN, 0.0, 5.0),
                (f64::INFINITY, 1.0, 5.0),
                (1.0, f64::NEG_INFINITY, 5.0),
                (1.0, 1.0, 0.0),
                (1.0, 1.0, -4.0),
                (1.0, 1.0, f64::NAN),
                (1e300, 1e300, 1e-300),
            ] {
                assert!(height(x, z, archetype, size).is_finite());
            }
        }
    }

    #[test]
    fn snapped_points_are_on_surface() {
        let p = snap_to_surface(DVec2::new(1.5, -2.0), Archetype::Desert, 6.0);
        assert_eq!(p.x, 1.5);
        assert_eq!(p.z, -2.0);
        assert!(is_on_surface(p, Archetype::Desert, 6.0, 1e-12));
    }
}
