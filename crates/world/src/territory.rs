//! Territory assembly.
//!
//! [`TerritoryGenerator`] runs the whole pipeline for a spec: palette, shape,
//! base surface, ornament configuration and placement. Every call starts from
//! the spec's seed with fresh generators, so territories can be generated in
//! any order or in parallel with identical results.

use crate::activity::TerritoryActivity;
use crate::archetype::Archetype;
use crate::ornaments::{
    ornament_config, place_ornaments, GroupName, OrnamentConfig, OrnamentGroups,
    PlacementContext, PlacementReport,
};
use crate::palette::{generate_color_scheme, ColorScheme};
use crate::settings::GenerationSettings;
use crate::shape::{shape_for, Landmass};
use crate::spec::{RawTerritorySpec, SpecIssue, TerritorySpec};
use crate::streams;
use glam::DVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use terrafuse_core::{sub_seed, Rgb};
use tracing::{debug, instrument};

/// Extra extrusion depth per fusion level above 1.
pub const DEPTH_PER_FUSION: f64 = 0.04;

/// The raised landform under the ornaments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSurface {
    pub landmasses: Vec<Landmass>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tree_anchors: Vec<DVec2>,
    pub extrusion_depth: f64,
    pub top_color: Rgb,
    pub side_color: Rgb,
    pub edge_color: Rgb,
}

/// Extrusion depth: an archetype fraction of size, growing mildly with fusion.
pub fn extrusion_depth(archetype: Archetype, size: f64, fusion_level: u32) -> f64 {
    let growth = 1.0 + DEPTH_PER_FUSION * f64::from(fusion_level.saturating_sub(1));
    size * archetype.depth_fraction() * growth
}

/// A fully generated territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryModel {
    pub spec: TerritorySpec,
    pub colors: ColorScheme,
    pub surface: BaseSurface,
    pub config: OrnamentConfig,
    pub ornaments: OrnamentGroups,
    pub report: PlacementReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<TerritoryActivity>,
}

impl TerritoryModel {
    /// Ornament groups whose contents differ from `other`.
    pub fn changed_groups(&self, other: &TerritoryModel) -> Vec<GroupName> {
        GroupName::ALL
            .into_iter()
            .filter(|name| self.ornaments.group(*name) != other.ornaments.group(*name))
            .collect()
    }

    /// Whether the base surface differs from `other`.
    pub fn surface_changed(&self, other: &TerritoryModel) -> bool {
        self.surface != other.surface || self.colors != other.colors
    }

    /// Total number of ornament instances.
    pub fn instance_count(&self) -> usize {
        self.ornaments.len()
    }
}

/// Entry point of the generation engine.
#[derive(Debug, Clone, Default)]
pub struct TerritoryGenerator {
    settings: GenerationSettings,
}

impl TerritoryGenerator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings: settings.sanitized(),
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generate a territory.
    pub fn generate(&self, spec: &TerritorySpec) -> TerritoryModel {
        self.generate_with_activity(spec, None)
    }

    /// Generate a territory with activity-based cosmetic scaling.
    #[instrument(
        skip(self, spec, activity),
        fields(territory = %spec.id, archetype = %spec.archetype, seed = spec.visual_seed)
    )]
    pub fn generate_with_activity(
        &self,
        spec: &TerritorySpec,
        activity: Option<&TerritoryActivity>,
    ) -> TerritoryModel {
        let spec = spec.normalized(self.settings.default_size);
        debug!(fusion = spec.fusion_level, size = spec.size, "generating territory");

        let colors = generate_color_scheme(
            spec.visual_seed,
            spec.fusion_level,
            spec.color_palette_index,
        );
        let shape = shape_for(
            spec.archetype,
            spec.size,
            sub_seed(spec.visual_seed, streams::SHAPE),
            spec.shape_variant,
        );
        let config = ornament_config(spec.archetype, spec.fusion_level, spec.visual_seed);

        let ctx = PlacementContext {
            archetype: spec.archetype,
            size: spec.size,
            visual_seed: spec.visual_seed,
            fusion_level: spec.fusion_level,
            shape: &shape,
            colors: &colors,
            settings: &self.settings,
            activity,
        };
        let (ornaments, report) = place_ornaments(&ctx, &config);

        let surface = BaseSurface {
            extrusion_depth: extrusion_depth(spec.archetype, spec.size, spec.fusion_level),
            top_color: colors.primary,
            side_color: colors.primary.darken(0.35),
            edge_color: colors.outline,
            landmasses: shape.landmasses,
            tree_anchors: shape.tree_anchors,
        };

        debug!(
            placed = report.placed,
            degraded = report.degraded,
            skipped = report.skipped,
            "territory generated"
        );

        TerritoryModel {
            spec,
            colors,
            surface,
            config,
            ornaments,
            report,
            activity: activity.cloned(),
        }
    }

    /// Rerun the full pipeline at another fusion level.
    pub fn regenerate(&self, model: &TerritoryModel, fusion_level: u32) -> TerritoryModel {
        let spec = model.spec.with_fusion_level(fusion_level);
        let upgraded = self.generate_with_activity(&spec, model.activity.as_ref());
        debug!(
            territory = %spec.id,
            from = model.spec.fusion_level,
            to = upgraded.spec.fusion_level,
            surface_changed = model.surface_changed(&upgraded),
            groups = ?model.changed_groups(&upgraded),
            "territory regenerated"
        );
        upgraded
    }

    /// Sanitize a raw spec, then generate. Never fails.
    pub fn generate_raw(&self, raw: &RawTerritorySpec) -> (TerritoryModel, Vec<SpecIssue>) {
        let (spec, issues) = raw.sanitize(self.settings.default_size);
        (self.generate(&spec), issues)
    }

    /// Generate many territories in parallel. Output order matches input order.
    pub fn generate_batch(&self, specs: &[TerritorySpec]) -> Vec<TerritoryModel> {
        specs.par_iter().map(|spec| self.generate(spec)).collect()
    }
}
