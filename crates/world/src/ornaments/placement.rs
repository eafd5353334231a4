//! Placement driver.
//!
//! Runs every sub-generator in a fixed order, each on its own seeded stream,
//! and folds their per-instance results into [`OrnamentGroups`] plus a
//! [`PlacementReport`]. A failed instance never aborts the territory: missing
//! anchors are skipped and invalid geometry becomes a fallback instance.

use crate::activity::TerritoryActivity;
use crate::archetype::Archetype;
use crate::elevation::snap_to_surface;
use crate::ornaments::config::OrnamentConfig;
use crate::ornaments::special::place_special;
use crate::ornaments::{
    buildings, features, paths, treasure, trees, OrnamentCategory, OrnamentGroups,
    OrnamentInstance, PlacementError, PlacementReport,
};
use crate::palette::ColorScheme;
use crate::settings::GenerationSettings;
use crate::shape::ShapeDescriptor;
use crate::streams;
use glam::{DVec2, DVec3};
use terrafuse_core::{indexed_seed, sub_seed, Rgb, SeededRng};
use tracing::{debug, warn};

/// Everything a sub-generator reads. Nothing in it is mutated by placement.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub archetype: Archetype,
    pub size: f64,
    pub visual_seed: u32,
    pub fusion_level: u32,
    pub shape: &'a ShapeDescriptor,
    pub colors: &'a ColorScheme,
    pub settings: &'a GenerationSettings,
    pub activity: Option<&'a TerritoryActivity>,
}

impl<'a> PlacementContext<'a> {
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Seed of a placement stream.
    pub fn stream_seed(&self, stream: u32) -> u32 {
        sub_seed(self.visual_seed, stream)
    }

    /// Fresh generator for a placement stream.
    pub fn stream(&self, stream: u32) -> SeededRng {
        SeededRng::new(self.stream_seed(stream))
    }

    /// Style-variant seed of instance `index` within a stream.
    pub fn variant_seed(&self, stream: u32, index: usize) -> u32 {
        indexed_seed(self.stream_seed(stream), index as u32)
    }

    /// Lift a planar point onto the terrain.
    pub fn snap(&self, planar: DVec2) -> DVec3 {
        snap_to_surface(planar, self.archetype, self.size)
    }

    pub fn tint(&self, category: OrnamentCategory) -> Rgb {
        category.tint(self.colors)
    }

    /// Reject non-finite planar positions.
    pub fn checked(
        &self,
        category: OrnamentCategory,
        planar: DVec2,
        variant_seed: u32,
    ) -> Result<DVec2, PlacementError> {
        if planar.is_finite() {
            Ok(planar)
        } else {
            Err(PlacementError::InvalidGeometry {
                category,
                at: DVec2::ZERO,
                variant_seed,
                reason: "non-finite position".to_string(),
            })
        }
    }
}

/// Place every ornament for a territory.
pub fn place_ornaments(
    ctx: &PlacementContext<'_>,
    config: &OrnamentConfig,
) -> (OrnamentGroups, PlacementReport) {
    let mut collector = Collector::new(ctx);

    collector.absorb(buildings::place_buildings(ctx, config.building_count));
    collector.absorb(trees::place_trees(ctx, config.tree_count));
    collector.absorb(features::place_features(ctx, config));
    collector.absorb(treasure::place_treasure(ctx, config.treasure_count));
    collector.absorb(paths::place_paths(ctx, config.path_count, config.building_count));

    match config.special_structures() {
        Ok(structures) => {
            let results = structures
                .iter()
                .enumerate()
                .map(|(index, structure)| {
                    place_special(ctx, structure, ctx.variant_seed(streams::SPECIAL, index))
                })
                .collect();
            collector.absorb(results);
        }
        Err(err) => warn!(%err, "omitting special structures"),
    }

    collector.finish()
}

struct Collector<'c, 'a> {
    ctx: &'c PlacementContext<'a>,
    groups: OrnamentGroups,
    report: PlacementReport,
}

impl<'c, 'a> Collector<'c, 'a> {
    fn new(ctx: &'c PlacementContext<'a>) -> Self {
        Self {
            ctx,
            groups: OrnamentGroups::default(),
            report: PlacementReport::default(),
        }
    }

    fn absorb(&mut self, results: Vec<Result<OrnamentInstance, PlacementError>>) {
        for result in results {
            match result {
                Ok(instance) => {
                    self.report.placed += 1;
                    self.groups.push(instance);
                }
                Err(err @ PlacementError::AnchorNotFound { .. }) => {
                    debug!(%err, "skipping ornament");
                    self.report.skipped += 1;
                }
                Err(PlacementError::InvalidGeometry {
                    category,
                    at,
                    variant_seed,
                    reason,
                }) => {
                    debug!(?category, %reason, "placing fallback ornament");
                    let at = if at.is_finite() { at } else { DVec2::ZERO };
                    self.report.degraded += 1;
                    self.groups.push(OrnamentInstance::fallback(
                        category,
                        self.ctx.snap(at),
                        variant_seed,
                        self.ctx.tint(category),
                    ));
                }
            }
        }
    }

    fn finish(self) -> (OrnamentGroups, PlacementReport) {
        (self.groups, self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevation::is_on_surface;
    use crate::ornaments::config::ornament_config;
    use crate::palette::generate_color_scheme;
    use crate::shape::shape_for;

    fn run(archetype: Archetype, size: f64, seed: u32, fusion: u32) -> (OrnamentGroups, PlacementReport) {
        run_with(archetype, size, seed, fusion, &ornament_config(archetype, fusion, seed))
    }

    fn run_with(
        archetype: Archetype,
        size: f64,
        seed: u32,
        fusion: u32,
        config: &OrnamentConfig,
    ) -> (OrnamentGroups, PlacementReport) {
        let shape = shape_for(archetype, size, seed, 0);
        let colors = generate_color_scheme(seed, fusion, 0);
        let settings = GenerationSettings::default();
        let ctx = PlacementContext {
            archetype,
            size,
            visual_seed: seed,
            fusion_level: fusion,
            shape: &shape,
            colors: &colors,
            settings: &settings,
            activity: None,
        };
        place_ornaments(&ctx, config)
    }

    #[test]
    fn report_accounts_for_every_instance() {
        for archetype in Archetype::ALL {
            let (groups, report) = run(archetype, 9.0, 1234, 4);
            assert_eq!(groups.len() as u32, report.placed + report.degraded);
        }
    }

    #[test]
    fn every_instance_is_snapped() {
        for archetype in Archetype::ALL {
            let (groups, _) = run(archetype, 7.0, 55, 6);
            for instance in groups.instances() {
                for point in instance.surface_points() {
                    assert!(
                        is_on_surface(point, archetype, 7.0, 1e-9),
                        "{archetype} {:?} off surface",
                        instance.category
                    );
                }
            }
        }
    }

    #[test]
    fn malformed_special_payload_is_omitted() {
        let mut config = ornament_config(Archetype::Mainland, 3, 424_242);
        assert!(config.special_structures.is_some());
        config.special_structures = Some("{not json".into());

        let (groups, report) = run_with(Archetype::Mainland, 10.0, 424_242, 3, &config);
        assert!(groups.special.is_empty());
        assert_eq!(groups.buildings.len() as u32, config.building_count);
        assert_eq!(groups.trees.len() as u32, config.tree_count);
        assert_eq!(groups.paths.len() as u32, config.path_count);
        assert_eq!(groups.len() as u32, report.placed + report.degraded);
    }

    #[test]
    fn placement_is_reproducible() {
        assert_eq!(
            run(Archetype::Forest, 8.0, 7, 3),
            run(Archetype::Forest, 8.0, 7, 3)
        );
    }

    #[test]
    fn non_finite_positions_become_invalid_geometry() {
        let shape = shape_for(Archetype::Island, 5.0, 1, 0);
        let colors = generate_color_scheme(1, 1, 0);
        let settings = GenerationSettings::default();
        let ctx = PlacementContext {
            archetype: Archetype::Island,
            size: 5.0,
            visual_seed: 1,
            fusion_level: 1,
            shape: &shape,
            colors: &colors,
            settings: &settings,
            activity: None,
        };
        let err = ctx
            .checked(OrnamentCategory::Tree, DVec2::new(f64::NAN, 0.0), 3)
            .expect_err("nan rejected");
        assert!(matches!(err, PlacementError::InvalidGeometry { .. }));

        let mut collector = Collector::new(&ctx);
        collector.absorb(vec![
            Err(err),
            Err(PlacementError::AnchorNotFound {
                category: OrnamentCategory::Lake,
                attempts: 12,
            }),
        ]);
        let (groups, report) = collector.finish();
        assert_eq!(report.degraded, 1);
        assert_eq!(report.skipped, 1);
        assert!(groups.trees[0].is_fallback());
        assert!(is_on_surface(groups.trees[0].position, Archetype::Island, 5.0, 1e-12));
    }
}
