//! Terrain feature generators.
//!
//! Features need a free anchor on land. Candidates are drawn uniformly over
//! the shape's extent and accepted when they lie inside a landmass and keep
//! `feature_clearance * size` away from every feature placed before them.
//! The mountains archetype anchors its first mountains at the shape's peak
//! markers. Bridges span antipodal points of the territory and do not take
//! part in the anchor search.

use crate::archetype::ReliefFeature;
use crate::geometry::{
    all_finite, distinct_vertex_count, even_angle, max_radius, polar, yaw_towards,
};
use crate::ornaments::config::OrnamentConfig;
use crate::ornaments::placement::PlacementContext;
use crate::ornaments::trees::pick_style;
use crate::ornaments::{
    OrnamentCategory, OrnamentDetail, OrnamentInstance, PatchTree, PlacementError, Stone,
};
use crate::streams;
use glam::{DVec2, DVec3};
use std::f64::consts::PI;
use terrafuse_core::SeededRng;

/// Radius of bridge endpoints as a fraction of size.
pub const BRIDGE_REACH: f64 = 0.95;
/// Vertices in a lake outline.
pub const LAKE_VERTICES: usize = 8;
/// Radius of a forest patch as a fraction of size.
pub const PATCH_RADIUS: f64 = 0.08;

type Placed = Result<OrnamentInstance, PlacementError>;

/// Rejection sampler for feature anchors.
pub struct AnchorSearch<'c, 'a> {
    ctx: &'c PlacementContext<'a>,
    occupied: Vec<(DVec2, f64)>,
    extent: f64,
}

impl<'c, 'a> AnchorSearch<'c, 'a> {
    pub fn new(ctx: &'c PlacementContext<'a>) -> Self {
        let extent = ctx
            .shape
            .landmasses
            .iter()
            .map(|landmass| landmass.offset.length() + max_radius(&landmass.outline))
            .fold(0.0, f64::max);
        Self {
            ctx,
            occupied: Vec::new(),
            extent: if extent > 0.0 { extent } else { ctx.size() },
        }
    }

    /// Mark a footprint as taken without checking clearance.
    pub fn reserve(&mut self, at: DVec2, radius: f64) {
        self.occupied.push((at, radius));
    }

    /// Find a free anchor for a feature of the given footprint radius.
    pub fn find(
        &mut self,
        rng: &mut SeededRng,
        category: OrnamentCategory,
        footprint: f64,
    ) -> Result<DVec2, PlacementError> {
        let attempts = self.ctx.settings.max_anchor_attempts.max(1);
        let clearance = self.ctx.settings.feature_clearance * self.ctx.size();
        for _ in 0..attempts {
            let candidate = polar(rng.next_angle(), self.extent * rng.next().sqrt());
            if !self.ctx.shape.contains(candidate) {
                continue;
            }
            let free = self
                .occupied
                .iter()
                .all(|(at, radius)| at.distance(candidate) >= radius + footprint + clearance);
            if free {
                self.reserve(candidate, footprint);
                return Ok(candidate);
            }
        }
        Err(PlacementError::AnchorNotFound { category, attempts })
    }
}

/// Place relief, lakes, forest patches and bridges, in that order.
pub fn place_features(ctx: &PlacementContext<'_>, config: &OrnamentConfig) -> Vec<Placed> {
    let mut rng = ctx.stream(streams::FEATURES);
    let mut search = AnchorSearch::new(ctx);
    let mut results = Vec::new();
    let mut next_variant = {
        let mut index = 0;
        move || {
            let seed = ctx.variant_seed(streams::FEATURES, index);
            index += 1;
            seed
        }
    };

    let peaks = ctx.shape.peaks();
    for i in 0..config.mountain_count as usize {
        let variant_seed = next_variant();
        let placed = match ctx.archetype.relief_feature() {
            ReliefFeature::Mountain => {
                mountain(ctx, &mut rng, &mut search, peaks.get(i).copied(), variant_seed)
            }
            ReliefFeature::Rock => rock(ctx, &mut rng, &mut search, variant_seed),
            ReliefFeature::Hill => hill(ctx, &mut rng, &mut search, variant_seed),
        };
        results.push(placed);
    }

    for _ in 0..config.lake_count {
        let variant_seed = next_variant();
        results.push(lake(ctx, &mut rng, &mut search, variant_seed));
    }

    let patches = (config.forest_patch_count as usize).min(ctx.shape.tree_anchors.len());
    for anchor in ctx.shape.tree_anchors.iter().take(patches) {
        let variant_seed = next_variant();
        results.push(forest_patch(ctx, &mut rng, &mut search, *anchor, variant_seed));
    }

    results.extend(place_bridges(ctx, config.bridge_count));
    results
}

fn invalid(category: OrnamentCategory, at: DVec2, variant_seed: u32, reason: &str) -> PlacementError {
    PlacementError::InvalidGeometry {
        category,
        at,
        variant_seed,
        reason: reason.to_string(),
    }
}

/// Mountain with a short ridge crest. A peak marker from the shape, when
/// given, fixes the anchor and peak height.
pub fn mountain(
    ctx: &PlacementContext<'_>,
    rng: &mut SeededRng,
    search: &mut AnchorSearch<'_, '_>,
    peak: Option<DVec3>,
    variant_seed: u32,
) -> Placed {
    let size = ctx.size();
    let base_radius = size * rng.next_float(0.12, 0.2);
    let height_factor = rng.next_float(1.2, 2.0);
    let ridge_angle = rng.next_angle();
    let ridge_points = rng.next_int(3, 5) as usize;

    let (anchor, peak_height) = match peak {
        Some(peak) => {
            let anchor = DVec2::new(peak.x, peak.z);
            search.reserve(anchor, base_radius);
            (anchor, peak.y)
        }
        None => (
            search.find(rng, OrnamentCategory::Mountain, base_radius)?,
            base_radius * height_factor,
        ),
    };

    let direction = polar(ridge_angle, base_radius);
    let ridge: Vec<DVec3> = (0..ridge_points)
        .map(|k| {
            let t = k as f64 / (ridge_points - 1) as f64 * 2.0 - 1.0;
            ctx.snap(anchor + direction * t)
        })
        .collect();
    if !(anchor.is_finite() && peak_height.is_finite() && ridge.iter().all(|p| p.is_finite())) {
        return Err(invalid(
            OrnamentCategory::Mountain,
            anchor,
            variant_seed,
            "non-finite mountain",
        ));
    }

    Ok(OrnamentInstance {
        category: OrnamentCategory::Mountain,
        position: ctx.snap(anchor),
        rotation: ridge_angle,
        scale: 1.0,
        variant_seed,
        tint: ctx.tint(OrnamentCategory::Mountain),
        detail: OrnamentDetail::Mountain {
            base_radius,
            peak_height,
            snow_cap: peak_height > size * 0.25,
            ridge,
        },
    })
}

/// Cluster of 3–6 stones.
pub fn rock(
    ctx: &PlacementContext<'_>,
    rng: &mut SeededRng,
    search: &mut AnchorSearch<'_, '_>,
    variant_seed: u32,
) -> Placed {
    let footprint = ctx.size() * rng.next_float(0.05, 0.1);
    let anchor = search.find(rng, OrnamentCategory::Rock, footprint)?;
    let base = ctx.snap(anchor);
    let count = rng.next_int(3, 6);
    let stones = (0..count)
        .map(|_| {
            let planar = anchor + polar(rng.next_angle(), footprint * rng.next());
            Stone {
                offset: ctx.snap(planar) - base,
                radius: footprint * rng.next_float(0.25, 0.5),
            }
        })
        .collect();

    Ok(OrnamentInstance {
        category: OrnamentCategory::Rock,
        position: base,
        rotation: rng.next_angle(),
        scale: 1.0,
        variant_seed,
        tint: ctx.tint(OrnamentCategory::Rock),
        detail: OrnamentDetail::Rock { stones },
    })
}

pub fn hill(
    ctx: &PlacementContext<'_>,
    rng: &mut SeededRng,
    search: &mut AnchorSearch<'_, '_>,
    variant_seed: u32,
) -> Placed {
    let radius = ctx.size() * rng.next_float(0.12, 0.22);
    let height = radius * rng.next_float(0.25, 0.5);
    let anchor = search.find(rng, OrnamentCategory::Hill, radius)?;
    Ok(OrnamentInstance {
        category: OrnamentCategory::Hill,
        position: ctx.snap(anchor),
        rotation: 0.0,
        scale: 1.0,
        variant_seed,
        tint: ctx.tint(OrnamentCategory::Hill),
        detail: OrnamentDetail::Hill { radius, height },
    })
}

/// Lake with a closed, surface-snapped shoreline.
pub fn lake(
    ctx: &PlacementContext<'_>,
    rng: &mut SeededRng,
    search: &mut AnchorSearch<'_, '_>,
    variant_seed: u32,
) -> Placed {
    let radius = ctx.size() * rng.next_float(0.1, 0.18);
    let depth = radius * rng.next_float(0.2, 0.35);
    let anchor = search.find(rng, OrnamentCategory::Lake, radius)?;

    let mut shore: Vec<DVec2> = (0..LAKE_VERTICES)
        .map(|i| anchor + polar(even_angle(i, LAKE_VERTICES), radius * rng.next_float(0.75, 1.25)))
        .collect();
    if !all_finite(&shore) || distinct_vertex_count(&shore) < 3 {
        return Err(invalid(
            OrnamentCategory::Lake,
            anchor,
            variant_seed,
            "degenerate shoreline",
        ));
    }
    shore.push(shore[0]);

    Ok(OrnamentInstance {
        category: OrnamentCategory::Lake,
        position: ctx.snap(anchor),
        rotation: 0.0,
        scale: 1.0,
        variant_seed,
        tint: ctx.tint(OrnamentCategory::Lake),
        detail: OrnamentDetail::Lake {
            outline: shore.iter().map(|p| ctx.snap(*p)).collect(),
            depth,
        },
    })
}

/// Small grove around one of the shape's tree anchors.
pub fn forest_patch(
    ctx: &PlacementContext<'_>,
    rng: &mut SeededRng,
    search: &mut AnchorSearch<'_, '_>,
    anchor: DVec2,
    variant_seed: u32,
) -> Placed {
    let radius = ctx.size() * PATCH_RADIUS;
    search.reserve(anchor, radius);
    let count = rng.next_int(3, 6);
    let trees = (0..count)
        .map(|_| {
            let planar = anchor + polar(rng.next_angle(), radius * rng.next().sqrt());
            PatchTree {
                position: ctx.snap(planar),
                style: pick_style(ctx.archetype, rng),
                scale: rng.next_float(0.7, 1.1),
            }
        })
        .collect();

    Ok(OrnamentInstance {
        category: OrnamentCategory::ForestPatch,
        position: ctx.snap(anchor),
        rotation: 0.0,
        scale: 1.0,
        variant_seed,
        tint: ctx.tint(OrnamentCategory::ForestPatch),
        detail: OrnamentDetail::ForestPatch { trees },
    })
}

/// Bridges spanning antipodal points at [`BRIDGE_REACH`], fanned evenly
/// from a seeded base angle.
pub fn place_bridges(ctx: &PlacementContext<'_>, count: u32) -> Vec<Placed> {
    let mut rng = ctx.stream(streams::BRIDGES);
    let size = ctx.size();
    let base_angle = rng.next_angle();
    let reach = size * BRIDGE_REACH;

    (0..count as usize)
        .map(|i| {
            let variant_seed = ctx.variant_seed(streams::BRIDGES, i);
            let angle = base_angle + i as f64 * PI / f64::from(count);
            let start = polar(angle, reach);
            let end = polar(angle + PI, reach);
            let width = size * rng.next_float(0.04, 0.06);
            let arch_height = size * rng.next_float(0.05, 0.1);

            let midpoint = (start + end) * 0.5;
            if !(start.is_finite() && end.is_finite()) || start.distance(end) <= f64::EPSILON {
                return Err(invalid(
                    OrnamentCategory::Bridge,
                    DVec2::ZERO,
                    variant_seed,
                    "degenerate span",
                ));
            }

            Ok(OrnamentInstance {
                category: OrnamentCategory::Bridge,
                position: ctx.snap(midpoint),
                rotation: yaw_towards(start, end),
                scale: 1.0,
                variant_seed,
                tint: ctx.tint(OrnamentCategory::Bridge),
                detail: OrnamentDetail::Bridge {
                    start: ctx.snap(start),
                    end: ctx.snap(end),
                    width,
                    arch_height,
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::ornaments::config::ornament_config;
    use crate::palette::generate_color_scheme;
    use crate::settings::GenerationSettings;
    use crate::shape::{shape_for, ShapeDescriptor};

    fn with_ctx<R>(
        archetype: Archetype,
        seed: u32,
        settings: GenerationSettings,
        f: impl FnOnce(&PlacementContext<'_>, &ShapeDescriptor) -> R,
    ) -> R {
        let shape = shape_for(archetype, 10.0, seed, 0);
        let colors = generate_color_scheme(seed, 3, 0);
        let ctx = PlacementContext {
            archetype,
            size: 10.0,
            visual_seed: seed,
            fusion_level: 3,
            shape: &shape,
            colors: &colors,
            settings: &settings,
            activity: None,
        };
        f(&ctx, &shape)
    }

    #[test]
    fn anchors_land_inside_and_keep_clearance() {
        with_ctx(Archetype::Mainland, 8, GenerationSettings::default(), |ctx, shape| {
            let mut search = AnchorSearch::new(ctx);
            let mut rng = SeededRng::new(1);
            let mut found = Vec::new();
            for _ in 0..6 {
                if let Ok(anchor) = search.find(&mut rng, OrnamentCategory::Hill, 0.5) {
                    assert!(shape.contains(anchor));
                    found.push(anchor);
                }
            }
            assert!(!found.is_empty());
            for (i, a) in found.iter().enumerate() {
                for b in &found[i + 1..] {
                    assert!(a.distance(*b) >= 1.0 + 1.5 - 1e-9);
                }
            }
        });
    }

    #[test]
    fn crowded_search_reports_missing_anchor() {
        let settings = GenerationSettings {
            max_anchor_attempts: 5,
            ..GenerationSettings::default()
        };
        with_ctx(Archetype::Island, 4, settings, |ctx, _| {
            let mut search = AnchorSearch::new(ctx);
            search.reserve(DVec2::ZERO, 100.0);
            let err = search
                .find(&mut SeededRng::new(2), OrnamentCategory::Lake, 1.0)
                .expect_err("no room");
            assert_eq!(
                err,
                PlacementError::AnchorNotFound {
                    category: OrnamentCategory::Lake,
                    attempts: 5
                }
            );
        });
    }

    #[test]
    fn mountains_start_at_shape_peaks() {
        with_ctx(Archetype::Mountains, 424_242, GenerationSettings::default(), |ctx, shape| {
            let config = ornament_config(Archetype::Mountains, 3, 424_242);
            let placed = place_features(ctx, &config);
            let peaks = shape.peaks();
            let mountains: Vec<_> = placed
                .iter()
                .filter_map(|r| r.as_ref().ok())
                .filter(|i| i.category == OrnamentCategory::Mountain)
                .collect();
            assert!(mountains.len() >= peaks.len());
            for (mountain, peak) in mountains.iter().zip(peaks.iter()) {
                assert_eq!(mountain.position.x, peak.x);
                assert_eq!(mountain.position.z, peak.z);
                let OrnamentDetail::Mountain { peak_height, ridge, .. } = &mountain.detail else {
                    panic!("not a mountain");
                };
                assert_eq!(*peak_height, peak.y);
                assert!((3..=5).contains(&ridge.len()));
            }
        });
    }

    #[test]
    fn desert_spends_relief_on_rocks() {
        with_ctx(Archetype::Desert, 17, GenerationSettings::default(), |ctx, _| {
            let config = ornament_config(Archetype::Desert, 2, 17);
            for result in place_features(ctx, &config) {
                match result {
                    Ok(instance) => {
                        assert_ne!(instance.category, OrnamentCategory::Mountain);
                        if let OrnamentDetail::Rock { stones } = &instance.detail {
                            assert!((3..=6).contains(&stones.len()));
                        }
                    }
                    Err(err) => assert!(matches!(err, PlacementError::AnchorNotFound { .. })),
                }
            }
        });
    }

    #[test]
    fn lakes_have_closed_shorelines() {
        with_ctx(Archetype::Mainland, 99, GenerationSettings::default(), |ctx, _| {
            let mut search = AnchorSearch::new(ctx);
            let mut rng = SeededRng::new(5);
            if let Ok(instance) = lake(ctx, &mut rng, &mut search, 1) {
                let OrnamentDetail::Lake { outline, depth } = &instance.detail else {
                    panic!("not a lake");
                };
                assert_eq!(outline.len(), LAKE_VERTICES + 1);
                assert_eq!(outline[0], outline[LAKE_VERTICES]);
                assert!(*depth > 0.0);
            }
        });
    }

    #[test]
    fn forest_patches_follow_tree_anchors() {
        with_ctx(Archetype::Forest, 7, GenerationSettings::default(), |ctx, shape| {
            let config = ornament_config(Archetype::Forest, 1, 7);
            let patches: Vec<_> = place_features(ctx, &config)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|i| i.category == OrnamentCategory::ForestPatch)
                .collect();
            let expected = (config.forest_patch_count as usize).min(shape.tree_anchors.len());
            assert_eq!(patches.len(), expected);
            for (patch, anchor) in patches.iter().zip(&shape.tree_anchors) {
                assert_eq!(patch.planar(), *anchor);
            }
        });
    }

    #[test]
    fn bridges_span_antipodal_points() {
        with_ctx(Archetype::Archipelago, 3, GenerationSettings::default(), |ctx, _| {
            let bridges = place_bridges(ctx, 2);
            assert_eq!(bridges.len(), 2);
            for bridge in bridges.into_iter().map(|r| r.expect("bridge")) {
                let OrnamentDetail::Bridge { start, end, .. } = bridge.detail else {
                    panic!("not a bridge");
                };
                assert!((start.x + end.x).abs() < 1e-9);
                assert!((start.z + end.z).abs() < 1e-9);
                let reach = DVec2::new(start.x, start.z).length();
                assert!((reach - 10.0 * BRIDGE_REACH).abs() < 1e-9);
            }
        });
    }
}
