//! Treasure placement: alternating interior and just-outside-border spots.

use crate::geometry::polar;
use crate::ornaments::placement::PlacementContext;
use crate::ornaments::{
    OrnamentCategory, OrnamentDetail, OrnamentInstance, PlacementError, TreasureStyle,
};
use crate::streams;

/// Interior radius band as a fraction of size.
pub const INSIDE: (f64, f64) = (0.0, 0.5);
/// Exterior radius band as a fraction of size.
pub const OUTSIDE: (f64, f64) = (1.1, 1.4);

const STYLES: [TreasureStyle; 4] = [
    TreasureStyle::Chest,
    TreasureStyle::Crystal,
    TreasureStyle::CoinPile,
    TreasureStyle::Gem,
];

/// Even indices go inside, odd indices outside.
pub fn band_for(index: usize) -> (f64, f64) {
    if index % 2 == 0 {
        INSIDE
    } else {
        OUTSIDE
    }
}

pub fn place_treasure(
    ctx: &PlacementContext<'_>,
    count: u32,
) -> Vec<Result<OrnamentInstance, PlacementError>> {
    let mut rng = ctx.stream(streams::TREASURE);
    let size = ctx.size();
    let scale_boost = ctx.activity.map_or(1.0, |activity| activity.treasure_scale());
    let glow_boost = ctx.activity.map_or(0.0, |activity| activity.glow_boost());

    (0..count as usize)
        .map(|i| {
            let variant_seed = ctx.variant_seed(streams::TREASURE, i);
            let (lo, hi) = band_for(i);
            let angle = rng.next_angle();
            let radius = size * rng.next_float(lo, hi);
            let style = STYLES[rng.next_index(STYLES.len())];
            let scale = rng.next_float(0.8, 1.1);
            let glow = rng.next_float(0.2, 0.5);
            let rotation = rng.next_angle();

            let planar = ctx.checked(OrnamentCategory::Treasure, polar(angle, radius), variant_seed)?;
            Ok(OrnamentInstance {
                category: OrnamentCategory::Treasure,
                position: ctx.snap(planar),
                rotation,
                scale: scale * scale_boost,
                variant_seed,
                tint: ctx.tint(OrnamentCategory::Treasure),
                detail: OrnamentDetail::Treasure {
                    style,
                    glow: (glow + glow_boost * 0.5).min(1.0),
                },
            })
        })
        .collect()
}
