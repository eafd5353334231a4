//! Border-ring building placement.

use crate::archetype::Archetype;
use crate::geometry::{even_angle, polar, yaw_towards};
use crate::ornaments::placement::PlacementContext;
use crate::ornaments::{
    BuildingStyle, OrnamentCategory, OrnamentDetail, OrnamentInstance, PlacementError,
};
use crate::streams;
use glam::DVec2;

/// Ring radius as a fraction of size.
pub const RING_RADIUS: f64 = 1.1;
/// Radius jitter as a fraction of size.
pub const RADIUS_JITTER: f64 = 0.05;
/// Yaw deviation from facing the center, in radians.
pub const YAW_JITTER: f64 = 0.2;

/// One building position on the ring, before surface snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingSlot {
    pub angle: f64,
    pub planar: DVec2,
    pub yaw: f64,
    pub style: BuildingStyle,
    pub floors: u32,
    pub scale: f64,
}

fn style_pool(archetype: Archetype) -> &'static [BuildingStyle] {
    match archetype {
        Archetype::Mainland => &[
            BuildingStyle::Cottage,
            BuildingStyle::Barn,
            BuildingStyle::Watchtower,
        ],
        Archetype::Island => &[BuildingStyle::Hut, BuildingStyle::Cottage],
        Archetype::Peninsula => &[
            BuildingStyle::Cottage,
            BuildingStyle::Watchtower,
            BuildingStyle::Hut,
        ],
        Archetype::Mountains => &[BuildingStyle::Cabin, BuildingStyle::Lodge],
        Archetype::Archipelago => &[BuildingStyle::Hut],
        Archetype::Desert => &[BuildingStyle::Adobe, BuildingStyle::Tent],
        Archetype::Forest => &[BuildingStyle::Cabin, BuildingStyle::Lodge],
    }
}

/// Ring layout for `count` buildings, drawn from the building stream.
///
/// Angles are evenly spaced; only the radius, yaw and styling vary.
///
/// Paths replay this plan to aim at the same angles.
pub fn plan_buildings(ctx: &PlacementContext<'_>, count: u32) -> Vec<BuildingSlot> {
    let mut rng = ctx.stream(streams::BUILDINGS);
    let count = count as usize;
    let pool = style_pool(ctx.archetype);
    let size = ctx.size();

    (0..count)
        .map(|i| {
            let angle = even_angle(i, count);
            let radius = size * (RING_RADIUS + rng.next_signed(RADIUS_JITTER));
            let planar = polar(angle, radius);
            let yaw = yaw_towards(planar, DVec2::ZERO) + rng.next_signed(YAW_JITTER);
            let style = pool[rng.next_index(pool.len())];
            let floors = rng.next_int(1, 2) as u32 + ctx.fusion_level / 4;
            let scale = rng.next_float(0.85, 1.15);
            BuildingSlot {
                angle,
                planar,
                yaw,
                style,
                floors,
                scale,
            }
        })
        .collect()
}

pub fn place_buildings(
    ctx: &PlacementContext<'_>,
    count: u32,
) -> Vec<Result<OrnamentInstance, PlacementError>> {
    let level = ctx.activity.map_or(1, |activity| activity.building_level());
    let floor_bonus = ctx.activity.map_or(0, |activity| activity.floor_bonus());

    plan_buildings(ctx, count)
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            let variant_seed = ctx.variant_seed(streams::BUILDINGS, i);
            let planar = ctx.checked(OrnamentCategory::Building, slot.planar, variant_seed)?;
            Ok(OrnamentInstance {
                category: OrnamentCategory::Building,
                position: ctx.snap(planar),
                rotation: slot.yaw,
                scale: slot.scale * (1.0 + 0.1 * f64::from(level - 1)),
                variant_seed,
                tint: ctx.tint(OrnamentCategory::Building),
                detail: OrnamentDetail::Building {
                    style: slot.style,
                    floors: slot.floors + floor_bonus,
                    level,
                },
            })
        })
        .collect()
}
