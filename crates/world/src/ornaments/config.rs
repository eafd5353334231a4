//! Ornament configuration: archetype + fusion level + seed → counts.
//!
//! Seeded jitters are drawn before the fusion-gated special structure so the
//! jitter values, and therefore every count, are identical across fusion
//! levels of the same seed. Counts only grow with fusion.

use crate::archetype::Archetype;
use crate::ornaments::special::{
    decode_special_structures, encode_special_structures, SpecialStructure, SpecialStructureError,
};
use crate::spec::clamp_fusion;
use crate::streams;
use serde::{Deserialize, Serialize};
use terrafuse_core::{sub_seed, SeededRng};
use tracing::warn;

/// Trees every territory carries regardless of archetype or fusion.
pub const MIN_TREE_COUNT: u32 = 3;

/// Fusion level at which special structures unlock.
pub const SPECIAL_STRUCTURE_FUSION: u32 = 3;

/// Per-instance weight of the fusion bonus on trees.
pub const TREE_BONUS_WEIGHT: u32 = 3;

/// Per-archetype starting counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCounts {
    pub buildings: u32,
    pub treasure: u32,
    pub paths: u32,
    pub mountains: u32,
    pub trees: u32,
    pub lakes: u32,
    pub bridges: u32,
}

/// Starting counts for an archetype.
pub const fn base_counts(archetype: Archetype) -> BaseCounts {
    let (buildings, treasure, paths, mountains, trees, lakes, bridges) = match archetype {
        Archetype::Mainland => (4, 2, 3, 1, 5, 1, 0),
        Archetype::Island => (2, 3, 1, 0, 4, 0, 1),
        Archetype::Peninsula => (3, 2, 2, 1, 4, 1, 1),
        Archetype::Mountains => (1, 2, 1, 3, 5, 1, 0),
        Archetype::Archipelago => (1, 3, 1, 0, 3, 0, 2),
        Archetype::Desert => (2, 4, 2, 1, 1, 0, 0),
        Archetype::Forest => (1, 1, 1, 0, 8, 1, 0),
    };
    BaseCounts {
        buildings,
        treasure,
        paths,
        mountains,
        trees,
        lakes,
        bridges,
    }
}

/// Ornament counts for one territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrnamentConfig {
    pub building_count: u32,
    pub treasure_count: u32,
    pub path_count: u32,
    pub mountain_count: u32,
    pub tree_count: u32,
    pub lake_count: u32,
    pub bridge_count: u32,
    /// Forest patches requested; placement caps this at the shape's anchors.
    pub forest_patch_count: u32,
    /// Encoded special structures, present from fusion level 3.
    pub special_structures: Option<String>,
}

impl OrnamentConfig {
    /// Decoded special structures; empty when none are encoded.
    pub fn special_structures(&self) -> Result<Vec<SpecialStructure>, SpecialStructureError> {
        match &self.special_structures {
            Some(payload) => decode_special_structures(payload),
            None => Ok(Vec::new()),
        }
    }

    /// Sum of all instance counts except special structures.
    pub fn total_count(&self) -> u32 {
        self.building_count
            + self.treasure_count
            + self.path_count
            + self.mountain_count
            + self.tree_count
            + self.lake_count
            + self.bridge_count
            + self.forest_patch_count
    }
}

/// `fusion_level - 1`, after clamping the level into `[1, 10]`.
pub fn fusion_bonus(fusion_level: u32) -> u32 {
    clamp_fusion(fusion_level) - 1
}

/// Derive the ornament configuration for a territory.
pub fn ornament_config(archetype: Archetype, fusion_level: u32, visual_seed: u32) -> OrnamentConfig {
    let mut rng = SeededRng::new(sub_seed(visual_seed, streams::CONFIG));
    let base = base_counts(archetype);
    let bonus = fusion_bonus(fusion_level);

    let treasure_jitter = rng.next_int(0, 1) as u32;
    let tree_jitter = rng.next_int(0, 2) as u32;

    let special_structures = if clamp_fusion(fusion_level) >= SPECIAL_STRUCTURE_FUSION {
        let structure = SpecialStructure::generate(&mut rng);
        match encode_special_structures(&[structure]) {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(%err, "dropping special structure");
                None
            }
        }
    } else {
        None
    };

    let forest_patch_count = match archetype {
        Archetype::Forest => 2 + bonus / 2,
        Archetype::Mainland
        | Archetype::Island
        | Archetype::Peninsula
        | Archetype::Mountains
        | Archetype::Archipelago
        | Archetype::Desert => 0,
    };

    OrnamentConfig {
        building_count: base.buildings + bonus,
        treasure_count: base.treasure + treasure_jitter + bonus,
        path_count: base.paths + bonus,
        mountain_count: base.mountains + bonus,
        tree_count: (base.trees + tree_jitter + TREE_BONUS_WEIGHT * bonus).max(MIN_TREE_COUNT),
        lake_count: base.lakes,
        bridge_count: base.bridges,
        forest_patch_count,
        special_structures,
    }
}
