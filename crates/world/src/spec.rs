//! Territory input parameters.
//!
//! [`TerritorySpec`] is the validated, immutable input of a generation call.
//! [`RawTerritorySpec`] is what collaborators hand over (string archetype,
//! unchecked numbers); [`RawTerritorySpec::sanitize`] turns it into a spec
//! without ever failing, reporting each correction as a [`SpecIssue`].

use crate::archetype::Archetype;
use crate::palette::PALETTES;
use serde::{Deserialize, Serialize};
use terrafuse_core::{visual_seed, SEED_MASK};
use thiserror::Error;
use tracing::warn;

/// Lowest fusion tier.
pub const MIN_FUSION_LEVEL: u32 = 1;

/// Highest fusion tier.
pub const MAX_FUSION_LEVEL: u32 = 10;

/// Shape variants derivable from a token.
pub const SHAPE_VARIANTS: u32 = 4;

const MIN_DERIVED_SIZE: f64 = 6.0;
const DERIVED_SIZE_STEPS: u32 = 7;

/// Validated generation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritorySpec {
    pub id: String,
    pub archetype: Archetype,
    /// Linear scale of the territory.
    pub size: f64,
    pub visual_seed: u32,
    /// Fusion tier in `[1, 10]`.
    pub fusion_level: u32,
    pub color_palette_index: i32,
    pub shape_variant: u32,
}

impl TerritorySpec {
    /// Derive a spec from a token on a network.
    ///
    /// Archetype, size, palette and shape variant are fixed bit slices of the
    /// visual seed, so a token always maps to the same territory.
    pub fn from_token(token_id: &str, network_id: &str, fusion_level: u32) -> Self {
        let seed = visual_seed(token_id, network_id);
        Self {
            id: format!("{network_id}:{token_id}"),
            archetype: Archetype::from_index(seed % Archetype::ALL.len() as u32),
            size: MIN_DERIVED_SIZE + f64::from((seed >> 4) % DERIVED_SIZE_STEPS),
            visual_seed: seed,
            fusion_level: clamp_fusion(fusion_level),
            color_palette_index: ((seed >> 8) % PALETTES.len() as u32) as i32,
            shape_variant: (seed >> 12) % SHAPE_VARIANTS,
        }
    }

    /// Same territory at another fusion tier.
    pub fn with_fusion_level(&self, fusion_level: u32) -> Self {
        Self {
            fusion_level: clamp_fusion(fusion_level),
            ..self.clone()
        }
    }

    /// Same territory with a forced archetype.
    pub fn with_archetype(&self, archetype: Archetype) -> Self {
        Self {
            archetype,
            ..self.clone()
        }
    }

    /// Pull fields that bypassed [`RawTerritorySpec::sanitize`] back into range.
    pub fn normalized(&self, default_size: f64) -> Self {
        Self {
            size: if valid_size(self.size) {
                self.size
            } else {
                default_size
            },
            fusion_level: clamp_fusion(self.fusion_level),
            ..self.clone()
        }
    }
}

/// Clamp a fusion level into `[1, 10]`.
pub fn clamp_fusion(level: u32) -> u32 {
    level.clamp(MIN_FUSION_LEVEL, MAX_FUSION_LEVEL)
}

fn valid_size(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// A correction applied while sanitizing a raw spec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecIssue {
    #[error("unknown archetype `{0}`, using mainland")]
    UnknownArchetype(String),
    #[error("invalid size {0}, using default {1}")]
    InvalidSize(f64, f64),
    #[error("fusion level {0} out of range, clamped to {1}")]
    FusionOutOfRange(i64, u32),
    #[error("visual seed {0} out of range, wrapped to {1}")]
    SeedOutOfRange(i64, u32),
    #[error("shape variant {0} is negative, using 0")]
    NegativeShapeVariant(i64),
}

/// Spec as received from token/network resolution, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTerritorySpec {
    pub id: String,
    pub archetype: String,
    pub size: f64,
    pub visual_seed: i64,
    pub fusion_level: i64,
    #[serde(default)]
    pub color_palette_index: i64,
    #[serde(default)]
    pub shape_variant: i64,
}

impl RawTerritorySpec {
    /// Validate into a [`TerritorySpec`], falling back instead of failing.
    pub fn sanitize(&self, default_size: f64) -> (TerritorySpec, Vec<SpecIssue>) {
        let mut issues = Vec::new();

        let archetype = match self.archetype.parse::<Archetype>() {
            Ok(archetype) => archetype,
            Err(_) => {
                issues.push(SpecIssue::UnknownArchetype(self.archetype.clone()));
                Archetype::Mainland
            }
        };

        let size = if valid_size(self.size) {
            self.size
        } else {
            issues.push(SpecIssue::InvalidSize(self.size, default_size));
            default_size
        };

        let fusion_level = self
            .fusion_level
            .clamp(i64::from(MIN_FUSION_LEVEL), i64::from(MAX_FUSION_LEVEL))
            as u32;
        if i64::from(fusion_level) != self.fusion_level {
            issues.push(SpecIssue::FusionOutOfRange(self.fusion_level, fusion_level));
        }

        let visual_seed = (self.visual_seed.rem_euclid(i64::from(SEED_MASK) + 1)) as u32;
        if i64::from(visual_seed) != self.visual_seed {
            issues.push(SpecIssue::SeedOutOfRange(self.visual_seed, visual_seed));
        }

        let shape_variant = if self.shape_variant < 0 {
            issues.push(SpecIssue::NegativeShapeVariant(self.shape_variant));
            0
        } else {
            (self.shape_variant % i64::from(u32::MAX)) as u32
        };

        let color_palette_index = self
            .color_palette_index
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX))
            as i32;

        for issue in &issues {
            warn!(territory = %self.id, %issue, "sanitized territory spec");
        }

        (
            TerritorySpec {
                id: self.id.clone(),
                archetype,
                size,
                visual_seed,
                fusion_level,
                color_palette_index,
                shape_variant,
            },
            issues,
        )
    }
}

impl From<&TerritorySpec> for RawTerritorySpec {
    fn from(spec: &TerritorySpec) -> Self {
        Self {
            id: spec.id.clone(),
            archetype: spec.archetype.as_str().to_string(),
            size: spec.size,
            visual_seed: i64::from(spec.visual_seed),
            fusion_level: i64::from(spec.fusion_level),
            color_palette_index: i64::from(spec.color_palette_index),
            shape_variant: i64::from(spec.shape_variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(archetype: &str, size: f64, fusion: i64) -> RawTerritorySpec {
        RawTerritorySpec {
            id: "test:1".into(),
            archetype: archetype.into(),
            size,
            visual_seed: 424_242,
            fusion_level: fusion,
            color_palette_index: 0,
            shape_variant: 0,
        }
    }

    #[test]
    fn from_token_is_stable() {
        let a = TerritorySpec::from_token("42", "ethereum", 3);
        let b = TerritorySpec::from_token("42", "ethereum", 3);
        assert_eq!(a, b);
        assert_eq!(a.id, "ethereum:42");
        assert_eq!(a.visual_seed, 963_098_821);
        assert!((6.0..13.0).contains(&a.size));
        assert!(a.shape_variant < SHAPE_VARIANTS);
        assert!((a.color_palette_index as usize) < PALETTES.len());
    }

    #[test]
    fn from_token_clamps_fusion() {
        assert_eq!(TerritorySpec::from_token("1", "net", 0).fusion_level, 1);
        assert_eq!(TerritorySpec::from_token("1", "net", 99).fusion_level, 10);
    }

    #[test]
    fn valid_raw_spec_has_no_issues() {
        let (spec, issues) = raw("Forest", 8.0, 1).sanitize(8.0);
        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(spec.archetype, Archetype::Forest);
        assert_eq!(spec.visual_seed, 424_242);
    }

    #[test]
    fn unknown_archetype_falls_back_to_mainland() {
        let (spec, issues) = raw("volcano", 8.0, 2).sanitize(8.0);
        assert_eq!(spec.archetype, Archetype::Mainland);
        assert_eq!(issues, vec![SpecIssue::UnknownArchetype("volcano".into())]);
    }

    #[test]
    fn negative_size_and_fusion_are_repaired() {
        let (spec, issues) = raw("island", -3.0, 42).sanitize(8.0);
        assert_eq!(spec.size, 8.0);
        assert_eq!(spec.fusion_level, 10);
        assert_eq!(issues.len(), 2);

        let (spec, _) = raw("island", f64::NAN, -5).sanitize(5.0);
        assert_eq!(spec.size, 5.0);
        assert_eq!(spec.fusion_level, 1);
    }

    #[test]
    fn negative_seed_wraps_into_range() {
        let mut input = raw("desert", 4.0, 1);
        input.visual_seed = -1;
        let (spec, issues) = input.sanitize(8.0);
        assert_eq!(spec.visual_seed, SEED_MASK);
        assert!(matches!(issues[0], SpecIssue::SeedOutOfRange(-1, _)));
    }

    #[test]
    fn raw_roundtrip_preserves_valid_spec() {
        let spec = TerritorySpec::from_token("7", "polygon", 4);
        let (back, issues) = RawTerritorySpec::from(&spec).sanitize(8.0);
        assert!(issues.is_empty());
        assert_eq!(back, spec);
    }

    #[test]
    fn normalized_repairs_direct_construction() {
        let spec = TerritorySpec {
            id: "x".into(),
            archetype: Archetype::Island,
            size: -1.0,
            visual_seed: 5,
            fusion_level: 0,
            color_palette_index: 0,
            shape_variant: 0,
        }
        .normalized(8.0);
        assert_eq!(spec.size, 8.0);
        assert_eq!(spec.fusion_level, 1);
    }
}
