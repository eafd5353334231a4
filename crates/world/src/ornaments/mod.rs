//! Ornament data model and placement sub-generators.
//!
//! Sub-generators are pure functions returning instance lists (or per-instance
//! `Result`s); the driver in [`placement`] merges them into named groups.

pub mod buildings;
pub mod config;
pub mod features;
pub mod paths;
pub mod placement;
pub mod special;
pub mod treasure;
pub mod trees;

use crate::palette::ColorScheme;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use terrafuse_core::Rgb;
use thiserror::Error;

pub use config::{ornament_config, OrnamentConfig};
pub use placement::{place_ornaments, PlacementContext};
pub use special::{
    decode_special_structures, encode_special_structures, MonumentStyle, SpecialStructure,
    SpecialStructureError,
};

/// Ornament categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrnamentCategory {
    Building,
    Tree,
    Treasure,
    Path,
    Mountain,
    Lake,
    Rock,
    Hill,
    ForestPatch,
    Bridge,
    Special,
}

impl OrnamentCategory {
    /// Group the category is collected into.
    pub const fn group(self) -> GroupName {
        match self {
            OrnamentCategory::Building => GroupName::Buildings,
            OrnamentCategory::Tree => GroupName::Trees,
            OrnamentCategory::Treasure => GroupName::Treasures,
            OrnamentCategory::Path => GroupName::Paths,
            OrnamentCategory::Mountain
            | OrnamentCategory::Lake
            | OrnamentCategory::Rock
            | OrnamentCategory::Hill
            | OrnamentCategory::ForestPatch
            | OrnamentCategory::Bridge => GroupName::Features,
            OrnamentCategory::Special => GroupName::Special,
        }
    }

    /// Tint from the territory palette.
    pub fn tint(self, colors: &ColorScheme) -> Rgb {
        match self {
            OrnamentCategory::Building => colors.accent,
            OrnamentCategory::Tree | OrnamentCategory::ForestPatch => colors.secondary,
            OrnamentCategory::Treasure => colors.specular,
            OrnamentCategory::Path | OrnamentCategory::Bridge => colors.outline.lighten(0.3),
            OrnamentCategory::Mountain | OrnamentCategory::Rock | OrnamentCategory::Hill => {
                colors.primary.darken(0.2)
            }
            OrnamentCategory::Lake => colors.specular.lerp(colors.outline, 0.5),
            OrnamentCategory::Special => colors.accent.lighten(0.15),
        }
    }
}

/// Named instance collections under a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupName {
    Buildings,
    Trees,
    Features,
    Treasures,
    Paths,
    Special,
}

impl GroupName {
    /// All groups in attachment order.
    pub const ALL: [GroupName; 6] = [
        GroupName::Buildings,
        GroupName::Trees,
        GroupName::Features,
        GroupName::Treasures,
        GroupName::Paths,
        GroupName::Special,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            GroupName::Buildings => "buildings",
            GroupName::Trees => "trees",
            GroupName::Features => "features",
            GroupName::Treasures => "treasures",
            GroupName::Paths => "paths",
            GroupName::Special => "special",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStyle {
    Conifer,
    Leafy,
    Birch,
    Palm,
    Cactus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingStyle {
    Cottage,
    Watchtower,
    Barn,
    Hut,
    Cabin,
    Adobe,
    Tent,
    Lodge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasureStyle {
    Chest,
    Crystal,
    CoinPile,
    Gem,
}

/// A single stone in a rock formation, relative to the formation anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stone {
    pub offset: DVec3,
    pub radius: f64,
}

/// A tree inside a forest patch, already snapped to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchTree {
    pub position: DVec3,
    pub style: TreeStyle,
    pub scale: f64,
}

/// Category-specific payload of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrnamentDetail {
    Tree {
        style: TreeStyle,
        height: f64,
    },
    Building {
        style: BuildingStyle,
        floors: u32,
        level: u32,
    },
    Treasure {
        style: TreasureStyle,
        glow: f64,
    },
    Path {
        waypoints: Vec<DVec3>,
        width: f64,
    },
    Mountain {
        base_radius: f64,
        peak_height: f64,
        snow_cap: bool,
        ridge: Vec<DVec3>,
    },
    Lake {
        outline: Vec<DVec3>,
        depth: f64,
    },
    Rock {
        stones: Vec<Stone>,
    },
    Hill {
        radius: f64,
        height: f64,
    },
    ForestPatch {
        trees: Vec<PatchTree>,
    },
    Bridge {
        start: DVec3,
        end: DVec3,
        width: f64,
        arch_height: f64,
    },
    Special {
        structure: SpecialStructure,
        /// Surface-snapped ground contacts: both deck ends of a bridge,
        /// empty for single-footprint structures.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        anchors: Vec<DVec3>,
    },
    /// Plain stand-in used when a specialized generator could not produce
    /// valid geometry.
    Fallback,
}

/// A positioned ornament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrnamentInstance {
    pub category: OrnamentCategory,
    /// Local position; `y` is the surface height at `(x, z)`.
    pub position: DVec3,
    /// Yaw in radians; 0 faces +Z.
    pub rotation: f64,
    pub scale: f64,
    /// Sub-seed used to pick among style variants.
    pub variant_seed: u32,
    pub tint: Rgb,
    pub detail: OrnamentDetail,
}

impl OrnamentInstance {
    /// Stand-in instance for `category` at an already-snapped position.
    pub fn fallback(category: OrnamentCategory, position: DVec3, variant_seed: u32, tint: Rgb) -> Self {
        Self {
            category,
            position,
            rotation: 0.0,
            scale: 1.0,
            variant_seed,
            tint,
            detail: OrnamentDetail::Fallback,
        }
    }

    /// Whether this instance is a degraded stand-in.
    pub fn is_fallback(&self) -> bool {
        matches!(self.detail, OrnamentDetail::Fallback)
    }

    /// Every point of this instance that rests on the terrain surface.
    pub fn surface_points(&self) -> Vec<DVec3> {
        let mut points = vec![self.position];
        match &self.detail {
            OrnamentDetail::Path { waypoints, .. } => points.extend(waypoints.iter().copied()),
            OrnamentDetail::Lake { outline, .. } => points.extend(outline.iter().copied()),
            OrnamentDetail::ForestPatch { trees } => {
                points.extend(trees.iter().map(|tree| tree.position))
            }
            OrnamentDetail::Bridge { start, end, .. } => points.extend([*start, *end]),
            OrnamentDetail::Mountain { ridge, .. } => points.extend(ridge.iter().copied()),
            OrnamentDetail::Special { anchors, .. } => points.extend(anchors.iter().copied()),
            OrnamentDetail::Tree { .. }
            | OrnamentDetail::Building { .. }
            | OrnamentDetail::Treasure { .. }
            | OrnamentDetail::Rock { .. }
            | OrnamentDetail::Hill { .. }
            | OrnamentDetail::Fallback => {}
        }
        points
    }

    /// Planar position.
    pub fn planar(&self) -> DVec2 {
        DVec2::new(self.position.x, self.position.z)
    }
}

/// Why a single instance could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// No free anchor was found; the instance is skipped.
    #[error("no free anchor for {category:?} after {attempts} attempts")]
    AnchorNotFound {
        category: OrnamentCategory,
        attempts: u32,
    },
    /// Generated geometry was unusable; a fallback is placed at `at`.
    #[error("invalid {category:?} geometry at ({x:.3}, {z:.3}): {reason}", x = .at.x, z = .at.y)]
    InvalidGeometry {
        category: OrnamentCategory,
        at: DVec2,
        variant_seed: u32,
        reason: String,
    },
}

/// Outcome counts of one placement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub placed: u32,
    pub degraded: u32,
    pub skipped: u32,
}

/// Instances grouped by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrnamentGroups {
    pub buildings: Vec<OrnamentInstance>,
    pub trees: Vec<OrnamentInstance>,
    pub features: Vec<OrnamentInstance>,
    pub treasures: Vec<OrnamentInstance>,
    pub paths: Vec<OrnamentInstance>,
    pub special: Vec<OrnamentInstance>,
}

impl OrnamentGroups {
    /// Instances of one group.
    pub fn group(&self, name: GroupName) -> &[OrnamentInstance] {
        match name {
            GroupName::Buildings => &self.buildings,
            GroupName::Trees => &self.trees,
            GroupName::Features => &self.features,
            GroupName::Treasures => &self.treasures,
            GroupName::Paths => &self.paths,
            GroupName::Special => &self.special,
        }
    }

    fn group_mut(&mut self, name: GroupName) -> &mut Vec<OrnamentInstance> {
        match name {
            GroupName::Buildings => &mut self.buildings,
            GroupName::Trees => &mut self.trees,
            GroupName::Features => &mut self.features,
            GroupName::Treasures => &mut self.treasures,
            GroupName::Paths => &mut self.paths,
            GroupName::Special => &mut self.special,
        }
    }

    /// Append an instance to the group of its category.
    pub fn push(&mut self, instance: OrnamentInstance) {
        self.group_mut(instance.category.group()).push(instance);
    }

    /// Groups in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupName, &[OrnamentInstance])> + '_ {
        GroupName::ALL.into_iter().map(move |name| (name, self.group(name)))
    }

    /// All instances in attachment order.
    pub fn instances(&self) -> impl Iterator<Item = &OrnamentInstance> + '_ {
        self.iter().flat_map(|(_, instances)| instances.iter())
    }

    /// Total instance count.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, instances)| instances.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instances of one category, in placement order.
    pub fn of_category(&self, category: OrnamentCategory) -> Vec<&OrnamentInstance> {
        self.group(category.group())
            .iter()
            .filter(|instance| instance.category == category)
            .collect()
    }
}
