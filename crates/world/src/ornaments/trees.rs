//! Radial-band tree placement.
//!
//! Trees are split 30/40/30 into inner, middle and outer bands. Each tree
//! draws its angle, radius, style, height, scale and yaw from the tree stream
//! in that order.

use crate::archetype::Archetype;
use crate::geometry::polar;
use crate::ornaments::placement::PlacementContext;
use crate::ornaments::{OrnamentCategory, OrnamentDetail, OrnamentInstance, PlacementError, TreeStyle};
use crate::streams;
use terrafuse_core::SeededRng;

/// Radius bands as fractions of size, innermost first.
pub const BANDS: [(f64, f64); 3] = [(0.1, 0.35), (0.35, 0.65), (0.65, 0.9)];

/// Tree styles that suit an archetype.
pub fn style_pool(archetype: Archetype) -> &'static [TreeStyle] {
    match archetype {
        Archetype::Mainland => &[TreeStyle::Leafy, TreeStyle::Conifer, TreeStyle::Birch],
        Archetype::Island => &[TreeStyle::Palm, TreeStyle::Leafy],
        Archetype::Peninsula => &[TreeStyle::Leafy, TreeStyle::Palm, TreeStyle::Birch],
        Archetype::Mountains => &[TreeStyle::Conifer],
        Archetype::Archipelago => &[TreeStyle::Palm],
        Archetype::Desert => &[TreeStyle::Cactus, TreeStyle::Palm],
        Archetype::Forest => &[TreeStyle::Conifer, TreeStyle::Leafy, TreeStyle::Birch],
    }
}

/// Draw a style from the archetype's pool.
pub fn pick_style(archetype: Archetype, rng: &mut SeededRng) -> TreeStyle {
    let pool = style_pool(archetype);
    pool[rng.next_index(pool.len())]
}

/// Instances per band: 30% inner, 30% outer, the rest in the middle.
pub fn band_split(count: u32) -> [u32; 3] {
    let inner = count * 3 / 10;
    let outer = count * 3 / 10;
    [inner, count - inner - outer, outer]
}

pub fn place_trees(
    ctx: &PlacementContext<'_>,
    count: u32,
) -> Vec<Result<OrnamentInstance, PlacementError>> {
    let mut rng = ctx.stream(streams::TREES);
    let size = ctx.size();
    let mut placed = Vec::with_capacity(count as usize);

    for (band, band_count) in BANDS.iter().zip(band_split(count)) {
        for _ in 0..band_count {
            let index = placed.len();
            let variant_seed = ctx.variant_seed(streams::TREES, index);
            let angle = rng.next_angle();
            let radius = size * rng.next_float(band.0, band.1);
            let style = pick_style(ctx.archetype, &mut rng);
            let height = size * rng.next_float(0.06, 0.12);
            let scale = rng.next_float(0.8, 1.25);
            let rotation = rng.next_angle();

            placed.push(
                ctx.checked(OrnamentCategory::Tree, polar(angle, radius), variant_seed)
                    .map(|planar| OrnamentInstance {
                        category: OrnamentCategory::Tree,
                        position: ctx.snap(planar),
                        rotation,
                        scale,
                        variant_seed,
                        tint: ctx.tint(OrnamentCategory::Tree),
                        detail: OrnamentDetail::Tree { style, height },
                    }),
            );
        }
    }
    placed
}
