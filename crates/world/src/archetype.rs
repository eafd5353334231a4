//! Territory archetypes.
//!
//! Every per-archetype rule in the crate is an exhaustive `match` on
//! [`Archetype`], so adding or removing a kind is a compile-time change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The seven territory kinds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    #[default]
    Mainland,
    Island,
    Peninsula,
    Mountains,
    Archipelago,
    Desert,
    Forest,
}

/// Error returned when parsing an unknown archetype name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown archetype `{0}`")]
pub struct UnknownArchetype(pub String);

/// Which terrain feature an archetype uses to spend its mountain budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReliefFeature {
    Mountain,
    Rock,
    Hill,
}

impl Archetype {
    /// All archetypes in their stable order.
    pub const ALL: [Archetype; 7] = [
        Archetype::Mainland,
        Archetype::Island,
        Archetype::Peninsula,
        Archetype::Mountains,
        Archetype::Archipelago,
        Archetype::Desert,
        Archetype::Forest,
    ];

    /// Stable lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Archetype::Mainland => "mainland",
            Archetype::Island => "island",
            Archetype::Peninsula => "peninsula",
            Archetype::Mountains => "mountains",
            Archetype::Archipelago => "archipelago",
            Archetype::Desert => "desert",
            Archetype::Forest => "forest",
        }
    }

    /// Archetype at `index` in [`Archetype::ALL`], wrapping.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[index as usize % Self::ALL.len()]
    }

    /// Base extrusion depth as a fraction of territory size.
    pub const fn depth_fraction(self) -> f64 {
        match self {
            Archetype::Mainland => 0.12,
            Archetype::Island => 0.10,
            Archetype::Peninsula => 0.10,
            Archetype::Mountains => 0.18,
            Archetype::Archipelago => 0.08,
            Archetype::Desert => 0.09,
            Archetype::Forest => 0.12,
        }
    }

    /// Feature generator that realizes `mountain_count`.
    pub const fn relief_feature(self) -> ReliefFeature {
        match self {
            Archetype::Mainland | Archetype::Mountains => ReliefFeature::Mountain,
            Archetype::Desert => ReliefFeature::Rock,
            Archetype::Island
            | Archetype::Peninsula
            | Archetype::Archipelago
            | Archetype::Forest => ReliefFeature::Hill,
        }
    }

    /// Whether the shape is made of several independent landmasses.
    pub const fn is_multi_landmass(self) -> bool {
        matches!(self, Archetype::Mountains | Archetype::Archipelago)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|archetype| archetype.as_str() == normalized)
            .ok_or_else(|| UnknownArchetype(input.to_string()))
    }
}
