//! Shape variation engine: boundary polygons per archetype.
//!
//! Every function here is pure. Randomness comes from a generator seeded with
//! the supplied seed, and sub-shapes use deterministic sub-seeds so each one
//! can be reproduced in isolation.

use crate::archetype::Archetype;
use crate::geometry::{close_ring, contains, distinct_vertex_count, even_angle, is_closed, polar};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use terrafuse_core::{indexed_seed, sub_seed, SeededRng};

/// Radius variance for mainland outlines.
pub const MAINLAND_VARIANCE: f64 = 0.2;
/// Radius variance for island outlines.
pub const ISLAND_VARIANCE: f64 = 0.4;
/// Radius variance for desert outlines.
pub const DESERT_VARIANCE: f64 = 0.5;
/// Radius variance along the peninsula arc.
pub const PENINSULA_VARIANCE: f64 = 0.3;

/// Mountain peak count range.
pub const MOUNTAIN_PEAKS: (u32, u32) = (1, 4);
/// Archipelago island count range.
pub const ARCHIPELAGO_ISLANDS: (u32, u32) = (3, 7);

const PENINSULA_ARC_SAMPLES: usize = 9;
const FOREST_ANCHORS: (i32, i32) = (8, 16);
const FOREST_ANCHOR_REACH: f64 = 0.85;
const FOREST_ANCHOR_TRIES_PER_POINT: usize = 6;

/// One closed outline with its placement in the territory frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmass {
    /// Closed ring in the landmass' own frame (last point repeats the first).
    pub outline: Vec<DVec2>,
    /// Offset of the landmass frame from the territory center.
    pub offset: DVec2,
    /// Suggested relief height for this landmass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_hint: Option<f64>,
    /// Peak marker (territory frame) for mountain sub-shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<DVec3>,
}

impl Landmass {
    fn single(outline: Vec<DVec2>) -> Self {
        Self {
            outline,
            offset: DVec2::ZERO,
            height_hint: None,
            peak: None,
        }
    }

    /// Outline translated into the territory frame.
    pub fn world_outline(&self) -> Vec<DVec2> {
        self.outline.iter().map(|p| *p + self.offset).collect()
    }

    /// Whether the outline is a closed ring.
    pub fn is_closed(&self) -> bool {
        is_closed(&self.outline)
    }

    /// Distinct vertices, excluding the closing duplicate.
    pub fn vertex_count(&self) -> usize {
        distinct_vertex_count(&self.outline)
    }

    /// Whether a territory-frame point lies inside this landmass.
    pub fn contains(&self, point: DVec2) -> bool {
        contains(&self.outline, point - self.offset)
    }
}

/// Boundary description of a territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub landmasses: Vec<Landmass>,
    /// Seeded anchor points for forest patches (forest archetype only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tree_anchors: Vec<DVec2>,
}

impl ShapeDescriptor {
    /// Peak markers of all landmasses, in landmass order.
    pub fn peaks(&self) -> Vec<DVec3> {
        self.landmasses.iter().filter_map(|l| l.peak).collect()
    }

    /// Whether a territory-frame point lies on any landmass.
    pub fn contains(&self, point: DVec2) -> bool {
        self.landmasses.iter().any(|l| l.contains(point))
    }
}

/// Shape for `archetype`, with `variant` selecting an alternate outline of the
/// same archetype.
pub fn shape_for(archetype: Archetype, size: f64, seed: u32, variant: u32) -> ShapeDescriptor {
    let seed = if variant == 0 {
        seed
    } else {
        indexed_seed(seed, variant)
    };
    match archetype {
        Archetype::Mainland => single(mainland_shape(size, seed)),
        Archetype::Island => single(island_shape(size, seed)),
        Archetype::Desert => single(desert_shape(size, seed)),
        Archetype::Peninsula => single(peninsula_shape(size, seed)),
        Archetype::Mountains => ShapeDescriptor {
            landmasses: mountains_shape(size, seed, None),
            tree_anchors: Vec::new(),
        },
        Archetype::Archipelago => ShapeDescriptor {
            landmasses: archipelago_shape(size, seed, None),
            tree_anchors: Vec::new(),
        },
        Archetype::Forest => {
            let (outline, tree_anchors) = forest_shape(size, seed);
            ShapeDescriptor {
                landmasses: vec![Landmass::single(outline)],
                tree_anchors,
            }
        }
    }
}

fn single(outline: Vec<DVec2>) -> ShapeDescriptor {
    ShapeDescriptor {
        landmasses: vec![Landmass::single(outline)],
        tree_anchors: Vec::new(),
    }
}

/// Evenly sampled ring with radius `size * (1 - v + 2v * rand)`.
fn radial_outline(rng: &mut SeededRng, size: f64, points: usize, variance: f64) -> Vec<DVec2> {
    let mut ring: Vec<DVec2> = (0..points)
        .map(|i| {
            let radius = size * (1.0 - variance + 2.0 * variance * rng.next());
            polar(even_angle(i, points), radius)
        })
        .collect();
    close_ring(&mut ring);
    ring
}

/// Mainland: 10–14 points, low variance.
pub fn mainland_shape(size: f64, seed: u32) -> Vec<DVec2> {
    let mut rng = SeededRng::new(seed);
    let points = rng.next_int(10, 14) as usize;
    radial_outline(&mut rng, size, points, MAINLAND_VARIANCE)
}

/// Island: 8–12 points, medium variance.
pub fn island_shape(size: f64, seed: u32) -> Vec<DVec2> {
    let mut rng = SeededRng::new(seed);
    let points = rng.next_int(8, 12) as usize;
    radial_outline(&mut rng, size, points, ISLAND_VARIANCE)
}

/// Desert: 12–17 points, high variance.
pub fn desert_shape(size: f64, seed: u32) -> Vec<DVec2> {
    let mut rng = SeededRng::new(seed);
    let points = rng.next_int(12, 17) as usize;
    radial_outline(&mut rng, size, points, DESERT_VARIANCE)
}

/// Peninsula: a half-arc fan anchored at the origin.
pub fn peninsula_shape(size: f64, seed: u32) -> Vec<DVec2> {
    let mut rng = SeededRng::new(seed);
    let mut ring = Vec::with_capacity(PENINSULA_ARC_SAMPLES + 2);
    ring.push(DVec2::ZERO);
    for i in 0..PENINSULA_ARC_SAMPLES {
        let t = i as f64 / (PENINSULA_ARC_SAMPLES - 1) as f64;
        let angle = -FRAC_PI_2 + t * PI;
        let radius =
            size * (1.0 - PENINSULA_VARIANCE + 2.0 * PENINSULA_VARIANCE * rng.next());
        ring.push(polar(angle, radius));
    }
    close_ring(&mut ring);
    ring
}

/// Mountains: 1–4 island-style sub-shapes, each with a peak marker.
///
/// `count` overrides the seeded peak count and is clamped into range.
pub fn mountains_shape(size: f64, seed: u32, count: Option<u32>) -> Vec<Landmass> {
    let mut rng = SeededRng::new(seed);
    let count = resolve_count(&mut rng, count, MOUNTAIN_PEAKS);
    let spread = if count == 1 {
        0.0
    } else {
        size * rng.next_float(0.35, 0.55)
    };
    let rotation = rng.next_angle();

    (0..count)
        .map(|i| {
            let sub_size = size * rng.next_float(0.4, 0.55);
            let offset = polar(rotation + even_angle(i, count), spread);
            let peak_height = sub_size * rng.next_float(0.9, 1.4);
            Landmass {
                outline: island_shape(sub_size, sub_seed(seed, i as u32 + 1)),
                offset,
                height_hint: Some(peak_height),
                peak: Some(DVec3::new(offset.x, peak_height, offset.y)),
            }
        })
        .collect()
}

/// Archipelago: 3–7 island-style sub-shapes around a shared center.
///
/// `count` overrides the seeded island count and is clamped into range.
pub fn archipelago_shape(size: f64, seed: u32, count: Option<u32>) -> Vec<Landmass> {
    let mut rng = SeededRng::new(seed);
    let count = resolve_count(&mut rng, count, ARCHIPELAGO_ISLANDS);
    let spread = size * rng.next_float(0.55, 0.8);
    let rotation = rng.next_angle();

    (0..count)
        .map(|i| {
            let sub_size = size * rng.next_float(0.25, 0.4);
            let offset = polar(rotation + even_angle(i, count), spread);
            Landmass {
                outline: island_shape(sub_size, sub_seed(seed, i as u32 + 1)),
                offset,
                height_hint: Some(sub_size * rng.next_float(0.1, 0.25)),
                peak: None,
            }
        })
        .collect()
}

/// Forest: an island boundary plus tree anchors scattered uniformly inside it.
pub fn forest_shape(size: f64, seed: u32) -> (Vec<DVec2>, Vec<DVec2>) {
    let outline = island_shape(size, seed);
    let mut rng = SeededRng::new(sub_seed(seed, 1));
    let wanted = rng.next_int(FOREST_ANCHORS.0, FOREST_ANCHORS.1) as usize;

    let mut anchors = Vec::with_capacity(wanted);
    for _ in 0..wanted * FOREST_ANCHOR_TRIES_PER_POINT {
        if anchors.len() == wanted {
            break;
        }
        // sqrt keeps the density uniform over the disk
        let radius = size * FOREST_ANCHOR_REACH * rng.next().sqrt();
        let candidate = polar(rng.next_angle(), radius);
        if contains(&outline, candidate) {
            anchors.push(candidate);
        }
    }
    (outline, anchors)
}

fn resolve_count(rng: &mut SeededRng, count: Option<u32>, range: (u32, u32)) -> usize {
    let (lo, hi) = range;
    let count = match count {
        Some(count) => count,
        None => rng.next_int(lo as i32, hi as i32) as u32,
    };
    count.clamp(lo, hi) as usize
}
