//! Reference scenarios for specific archetype/seed combinations.

use std::f64::consts::TAU;
use terrafuse_testkit::assert_canonical_eq;
use terrafuse_world::geometry::even_angle;
use terrafuse_world::ornaments::config::fusion_bonus;
use terrafuse_world::{
    Archetype, GroupName, OrnamentCategory, TerritoryGenerator, TerritoryModel, TerritorySpec,
};

fn spec(archetype: Archetype, size: f64, seed: u32, fusion: u32, palette: i32) -> TerritorySpec {
    TerritorySpec {
        id: format!("scenario:{seed}"),
        archetype,
        size,
        visual_seed: seed,
        fusion_level: fusion,
        color_palette_index: palette,
        shape_variant: 0,
    }
}

#[test]
fn mountains_seed_424242_fusion_3() {
    let model = TerritoryGenerator::default().generate(&spec(
        Archetype::Mountains,
        10.0,
        424_242,
        3,
        0,
    ));
    let config = &model.config;
    let bonus = fusion_bonus(3);

    assert!(config.mountain_count >= 2);
    assert!(config.tree_count >= 3 + bonus);

    let landmasses = &model.surface.landmasses;
    assert!((1..=4).contains(&landmasses.len()));
    for landmass in landmasses {
        assert!(landmass.is_closed());
        assert!(landmass.vertex_count() >= 8);
        assert!(landmass.peak.is_some());
    }

    let structures = config.special_structures().expect("payload decodes");
    assert_eq!(structures.len(), 1);
    assert!(["tower", "monument", "bridge"].contains(&structures[0].kind()));
    assert_eq!(model.ornaments.special.len(), 1);

    let mountains = model.ornaments.of_category(OrnamentCategory::Mountain);
    assert!(mountains.len() >= landmasses.len());
}

#[test]
fn mainland_buildings_hold_even_spacing() {
    let model = TerritoryGenerator::default().generate(&spec(
        Archetype::Mainland,
        10.0,
        424_242,
        3,
        0,
    ));
    let buildings = &model.ornaments.buildings;
    assert!(buildings.len() >= 2);
    for (i, building) in buildings.iter().enumerate() {
        let planar = building.planar();
        let angle = planar.y.atan2(planar.x).rem_euclid(TAU);
        let expected = even_angle(i, buildings.len());
        let diff = (angle - expected).rem_euclid(TAU);
        assert!(diff.min(TAU - diff) < 1e-9, "building {i} at {angle} expected {expected}");
    }
}

#[test]
fn forest_seed_7_fusion_1() {
    let model = TerritoryGenerator::default().generate(&spec(Archetype::Forest, 8.0, 7, 1, 0));
    let config = &model.config;

    assert!(config.tree_count >= 3);
    assert!(config.special_structures.is_none());
    assert!(model.ornaments.special.is_empty());
    assert_eq!(config.lake_count, 1);
    assert_eq!(config.mountain_count, 0);
    assert_eq!(model.ornaments.trees.len() as u32, config.tree_count);
    assert!(!model.surface.tree_anchors.is_empty());
}

#[test]
fn fusion_upgrade_only_touches_changed_groups() {
    let generator = TerritoryGenerator::default();
    let base = generator.generate(&spec(Archetype::Island, 9.0, 31_337, 2, 3));
    let upgraded = generator.regenerate(&base, 3);

    let changed = base.changed_groups(&upgraded);
    assert!(changed.contains(&GroupName::Buildings));
    assert!(changed.contains(&GroupName::Trees));
    assert!(changed.contains(&GroupName::Special));
    assert_eq!(upgraded.spec.visual_seed, base.spec.visual_seed);
    assert_eq!(upgraded.surface.landmasses, base.surface.landmasses);
    assert!(upgraded.surface.extrusion_depth > base.surface.extrusion_depth);
    assert!(base.surface_changed(&upgraded));
}

#[test]
fn model_json_roundtrips() {
    let model = TerritoryGenerator::default().generate(&TerritorySpec::from_token(
        "1337", "ethereum", 6,
    ));
    let json = serde_json::to_string(&model).expect("serialize");
    let back: TerritoryModel = serde_json::from_str(&json).expect("deserialize");
    assert_canonical_eq(&model, &back).expect("canonical match");
    assert_eq!(back, model);
}
