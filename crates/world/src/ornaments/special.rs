//! Rare fusion-gated landmarks and their compact interchange encoding.
//!
//! Descriptors are stored in normalized territory coordinates (fractions of
//! size) so the same record can be placed on any territory scale. The encoded
//! form is a JSON list of tagged records holding at most one entry.

use crate::geometry::{polar, yaw_towards};
use crate::ornaments::placement::PlacementContext;
use crate::ornaments::{OrnamentCategory, OrnamentDetail, OrnamentInstance, PlacementError};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use terrafuse_core::SeededRng;
use thiserror::Error;

/// Most special structures a territory may carry.
pub const MAX_SPECIAL_STRUCTURES: usize = 1;

/// Monument silhouettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonumentStyle {
    Obelisk,
    Statue,
    Arch,
    Pillar,
}

const MONUMENT_STYLES: [MonumentStyle; 4] = [
    MonumentStyle::Obelisk,
    MonumentStyle::Statue,
    MonumentStyle::Arch,
    MonumentStyle::Pillar,
];

/// A special structure descriptor in normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialStructure {
    Tower {
        x: f64,
        z: f64,
        height: f64,
        radius: f64,
        tiers: u32,
    },
    Monument {
        x: f64,
        z: f64,
        height: f64,
        width: f64,
        style: MonumentStyle,
    },
    Bridge {
        start: [f64; 2],
        end: [f64; 2],
        width: f64,
        arch_height: f64,
    },
}

impl SpecialStructure {
    /// Stable type label.
    pub const fn kind(&self) -> &'static str {
        match self {
            SpecialStructure::Tower { .. } => "tower",
            SpecialStructure::Monument { .. } => "monument",
            SpecialStructure::Bridge { .. } => "bridge",
        }
    }

    /// Draw a structure from the stream.
    pub fn generate(rng: &mut SeededRng) -> Self {
        match rng.next_index(3) {
            0 => SpecialStructure::Tower {
                x: rng.next_signed(0.4),
                z: rng.next_signed(0.4),
                height: rng.next_float(0.3, 0.6),
                radius: rng.next_float(0.04, 0.08),
                tiers: rng.next_int(2, 5) as u32,
            },
            1 => SpecialStructure::Monument {
                x: rng.next_signed(0.4),
                z: rng.next_signed(0.4),
                height: rng.next_float(0.2, 0.45),
                width: rng.next_float(0.08, 0.15),
                style: MONUMENT_STYLES[rng.next_index(MONUMENT_STYLES.len())],
            },
            _ => {
                let angle = rng.next_angle();
                let reach = rng.next_float(0.5, 0.8);
                let start = polar(angle, reach);
                let end = polar(angle + PI, reach);
                SpecialStructure::Bridge {
                    start: start.to_array(),
                    end: end.to_array(),
                    width: rng.next_float(0.04, 0.07),
                    arch_height: rng.next_float(0.05, 0.12),
                }
            }
        }
    }

    fn numbers(&self) -> Vec<f64> {
        match self {
            SpecialStructure::Tower {
                x,
                z,
                height,
                radius,
                ..
            } => vec![*x, *z, *height, *radius],
            SpecialStructure::Monument {
                x, z, height, width, ..
            } => vec![*x, *z, *height, *width],
            SpecialStructure::Bridge {
                start,
                end,
                width,
                arch_height,
            } => vec![start[0], start[1], end[0], end[1], *width, *arch_height],
        }
    }

    fn validate(&self) -> Result<(), SpecialStructureError> {
        if self.numbers().iter().all(|value| value.is_finite()) {
            Ok(())
        } else {
            Err(SpecialStructureError::NonFinite(self.kind()))
        }
    }
}

/// Failure to encode or decode a special-structure payload.
#[derive(Debug, Error)]
pub enum SpecialStructureError {
    #[error("malformed special-structure payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0} special structures exceed the limit of {MAX_SPECIAL_STRUCTURES}")]
    TooMany(usize),
    #[error("{0} descriptor has a non-finite parameter")]
    NonFinite(&'static str),
}

/// Encode descriptors as a JSON list of records.
pub fn encode_special_structures(
    structures: &[SpecialStructure],
) -> Result<String, SpecialStructureError> {
    check(structures)?;
    Ok(serde_json::to_string(structures)?)
}

/// Decode a payload produced by [`encode_special_structures`].
pub fn decode_special_structures(
    payload: &str,
) -> Result<Vec<SpecialStructure>, SpecialStructureError> {
    let structures: Vec<SpecialStructure> = serde_json::from_str(payload)?;
    check(&structures)?;
    Ok(structures)
}

fn check(structures: &[SpecialStructure]) -> Result<(), SpecialStructureError> {
    if structures.len() > MAX_SPECIAL_STRUCTURES {
        return Err(SpecialStructureError::TooMany(structures.len()));
    }
    structures.iter().try_for_each(SpecialStructure::validate)
}

/// Scale a descriptor onto the territory and snap it to the surface.
pub fn place_special(
    ctx: &PlacementContext<'_>,
    structure: &SpecialStructure,
    variant_seed: u32,
) -> Result<OrnamentInstance, PlacementError> {
    let size = ctx.size();
    let (planar, rotation, ends) = match structure {
        SpecialStructure::Tower { x, z, .. } => (DVec2::new(*x, *z) * size, 0.0, Vec::new()),
        SpecialStructure::Monument { x, z, .. } => {
            let planar = DVec2::new(*x, *z) * size;
            (planar, yaw_towards(planar, DVec2::ZERO), Vec::new())
        }
        SpecialStructure::Bridge { start, end, .. } => {
            let start = DVec2::from_array(*start) * size;
            let end = DVec2::from_array(*end) * size;
            ((start + end) * 0.5, yaw_towards(start, end), vec![start, end])
        }
    };
    let planar = ctx.checked(OrnamentCategory::Special, planar, variant_seed)?;
    let anchors = ends
        .into_iter()
        .map(|end| {
            ctx.checked(OrnamentCategory::Special, end, variant_seed)
                .map(|end| ctx.snap(end))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OrnamentInstance {
        category: OrnamentCategory::Special,
        position: ctx.snap(planar),
        rotation: if rotation.is_finite() { rotation } else { 0.0 },
        scale: size,
        variant_seed,
        tint: ctx.tint(OrnamentCategory::Special),
        detail: OrnamentDetail::Special {
            structure: structure.clone(),
            anchors,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::elevation::is_on_surface;
    use crate::palette::generate_color_scheme;
    use crate::settings::GenerationSettings;
    use crate::shape::shape_for;

    fn place_on_island(structure: &SpecialStructure, size: f64) -> OrnamentInstance {
        let shape = shape_for(Archetype::Island, size, 0, 0);
        let colors = generate_color_scheme(0, 3, 0);
        let settings = GenerationSettings::default();
        let ctx = PlacementContext {
            archetype: Archetype::Island,
            size,
            visual_seed: 0,
            fusion_level: 3,
            shape: &shape,
            colors: &colors,
            settings: &settings,
            activity: None,
        };
        place_special(&ctx, structure, 9).expect("placed")
    }

    #[test]
    fn bridge_ends_are_scaled_and_snapped() {
        let size = 6.0;
        let bridge = SpecialStructure::Bridge {
            start: [-0.151, -0.719],
            end: [0.151, 0.719],
            width: 0.05,
            arch_height: 0.08,
        };
        let instance = place_on_island(&bridge, size);
        let OrnamentDetail::Special { anchors, .. } = &instance.detail else {
            panic!("expected a special detail, got {:?}", instance.detail);
        };
        assert_eq!(anchors.len(), 2);
        assert!((anchors[0].x + 0.151 * size).abs() < 1e-12);
        assert!((anchors[0].z + 0.719 * size).abs() < 1e-12);
        assert!((anchors[1].x - 0.151 * size).abs() < 1e-12);
        assert!((anchors[1].z - 0.719 * size).abs() < 1e-12);

        let points = instance.surface_points();
        assert_eq!(points.len(), 3);
        for point in points {
            assert!(is_on_surface(point, Archetype::Island, size, 1e-12));
        }
    }

    #[test]
    fn single_footprint_structures_have_no_anchors() {
        let tower = SpecialStructure::Tower {
            x: 0.2,
            z: -0.1,
            height: 0.4,
            radius: 0.05,
            tiers: 3,
        };
        let instance = place_on_island(&tower, 6.0);
        assert!(matches!(
            &instance.detail,
            OrnamentDetail::Special { anchors, .. } if anchors.is_empty()
        ));
        assert_eq!(instance.surface_points().len(), 1);
    }

    #[test]
    fn generated_structures_cover_all_kinds() {
        let mut kinds = std::collections::BTreeSet::new();
        for seed in 0..64 {
            let structure = SpecialStructure::generate(&mut SeededRng::new(seed));
            structure.validate().expect("finite");
            kinds.insert(structure.kind());
        }
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn bridge_endpoints_are_antipodal() {
        for seed in 0..64 {
            if let SpecialStructure::Bridge { start, end, .. } =
                SpecialStructure::generate(&mut SeededRng::new(seed))
            {
                assert!((start[0] + end[0]).abs() < 1e-12);
                assert!((start[1] + end[1]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn codec_roundtrips_losslessly() {
        for seed in 0..32 {
            let structures = vec![SpecialStructure::generate(&mut SeededRng::new(seed))];
            let payload = encode_special_structures(&structures).expect("encode");
            let decoded = decode_special_structures(&payload).expect("decode");
            assert_eq!(decoded, structures);
        }
        assert!(decode_special_structures("[]").expect("empty").is_empty());
    }

    #[test]
    fn payload_is_a_tagged_record_list() {
        let payload = encode_special_structures(&[SpecialStructure::Tower {
            x: 0.0,
            z: 0.5,
            height: 0.4,
            radius: 0.05,
            tiers: 3,
        }])
        .expect("encode");
        assert!(payload.starts_with("[{\"type\":\"tower\""));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            decode_special_structures("{not json"),
            Err(SpecialStructureError::Malformed(_))
        ));
        assert!(matches!(
            decode_special_structures(r#"[{"type":"castle","x":0}]"#),
            Err(SpecialStructureError::Malformed(_))
        ));
        let two = r#"[{"type":"tower","x":0,"z":0,"height":1,"radius":1,"tiers":2},
                      {"type":"tower","x":0,"z":0,"height":1,"radius":1,"tiers":2}]"#;
        assert!(matches!(
            decode_special_structures(two),
            Err(SpecialStructureError::TooMany(2))
        ));
    }
}
