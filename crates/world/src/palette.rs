//! Color genetics: seed → territory color scheme.
//!
//! A palette is picked from a fixed bank using the palette index plus a seeded
//! jitter, the fusion level selects one of four gradations per role, and every
//! role color receives a bounded seeded perturbation. All randomness comes
//! from the territory's palette stream.

use crate::streams;
use serde::{Deserialize, Serialize};
use terrafuse_core::{sub_seed, Rgb, SeededRng};

/// Maximum per-channel perturbation before scaling by the variance factor.
pub const MAX_CHANNEL_DRIFT: f64 = 20.0;

/// Blend factor toward white used to derive the specular color.
pub const SPECULAR_BLEND: f64 = 0.6;

/// Probability that the seeded jitter shifts to the next palette in the bank.
pub const PALETTE_JITTER_CHANCE: f64 = 0.25;

/// Fusion level at which the richest gradation is reached.
pub const MAX_GRADATION_FUSION: u32 = 5;

/// Gradations stored per role.
pub const GRADATIONS: usize = 4;

/// Final colors for one territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub outline: Rgb,
    pub specular: Rgb,
}

impl ColorScheme {
    /// All five colors in role order.
    pub fn colors(&self) -> [Rgb; 5] {
        [
            self.primary,
            self.secondary,
            self.accent,
            self.outline,
            self.specular,
        ]
    }
}

/// A named palette with four gradations per role, dullest first.
#[derive(Debug, Clone, Copy)]
pub struct NamedPalette {
    pub name: &'static str,
    pub primary: [u32; GRADATIONS],
    pub secondary: [u32; GRADATIONS],
    pub accent: [u32; GRADATIONS],
    pub outline: [u32; GRADATIONS],
}

/// The palette bank.
pub const PALETTES: [NamedPalette; 6] = [
    NamedPalette {
        name: "verdant",
        primary: [0x5B7F4A, 0x4F9A3F, 0x3FB43A, 0x2ED158],
        secondary: [0x8A7A58, 0x9C8355, 0xB08C4E, 0xC99A3E],
        accent: [0xC9B458, 0xE0C04A, 0xF2CC3A, 0xFFD92E],
        outline: [0x2F3B28, 0x27402A, 0x1E472B, 0x124F2F],
    },
    NamedPalette {
        name: "ember",
        primary: [0x8C5A44, 0xA65A3A, 0xC2552E, 0xE04E22],
        secondary: [0x6B5A50, 0x7A5548, 0x8C4E3E, 0xA04430],
        accent: [0xD9A35A, 0xEBAF4E, 0xF7BC3C, 0xFFCB2A],
        outline: [0x3A2420, 0x43211A, 0x4E1D14, 0x5A170C],
    },
    NamedPalette {
        name: "glacier",
        primary: [0x8FA7B5, 0x86B4CC, 0x78C2E3, 0x66D2FA],
        secondary: [0xC4CDD4, 0xCCD8E2, 0xD6E4F0, 0xE2F1FF],
        accent: [0x6C7FA6, 0x6078B8, 0x5270CC, 0x4266E3],
        outline: [0x2E3A44, 0x28404F, 0x20475C, 0x174F6B],
    },
    NamedPalette {
        name: "dusk",
        primary: [0x7A6C8C, 0x7E62A0, 0x8256B6, 0x8648CE],
        secondary: [0x9C7E8A, 0xAC7890, 0xBE6F96, 0xD2649C],
        accent: [0xD4A373, 0xE3A867, 0xF2AE58, 0xFFB547],
        outline: [0x2E2838, 0x2E2342, 0x2E1C4D, 0x2E1459],
    },
    NamedPalette {
        name: "sandstone",
        primary: [0xC2A878, 0xD1AE6C, 0xE0B45E, 0xF0BA4E],
        secondary: [0xA88F6A, 0xB38D5E, 0xC08A50, 0xCE8640],
        accent: [0x8C6A4A, 0x9A6440, 0xAA5C34, 0xBC5226],
        outline: [0x4A3B2A, 0x523C26, 0x5C3C20, 0x683B18],
    },
    NamedPalette {
        name: "amethyst",
        primary: [0x8E7AA8, 0x9670B8, 0x9F64CA, 0xA956DE],
        secondary: [0x7A8CA0, 0x7094B2, 0x649CC6, 0x56A6DC],
        accent: [0xB8C46C, 0xC4D05C, 0xD0DC4A, 0xDDE836],
        outline: [0x30283C, 0x2F2446, 0x2E1E52, 0x2D1760],
    },
];

/// Gradation index for a fusion level: `floor(min(1, f / 5) * 3)` with `f`
/// clamped into `[0, 5]`.
pub fn gradation_for_fusion(fusion_level: u32) -> usize {
    let f = fusion_level.min(MAX_GRADATION_FUSION) as f64;
    let normalized = (f / MAX_GRADATION_FUSION as f64).min(1.0);
    ((normalized * 3.0).floor() as usize).min(GRADATIONS - 1)
}

/// Bank slot for a palette index, after applying the seeded jitter.
pub fn palette_slot(palette_index: i32, jitter: bool) -> usize {
    let shifted = i64::from(palette_index) + i64::from(jitter);
    shifted.rem_euclid(PALETTES.len() as i64) as usize
}

/// Derive the color scheme for a territory.
pub fn generate_color_scheme(visual_seed: u32, fusion_level: u32, palette_index: i32) -> ColorScheme {
    let mut rng = SeededRng::new(sub_seed(visual_seed, streams::PALETTE));

    let jitter = rng.chance(PALETTE_JITTER_CHANCE);
    let palette = &PALETTES[palette_slot(palette_index, jitter)];
    let gradation = gradation_for_fusion(fusion_level);
    let factor = rng.next();

    let primary = perturb(Rgb::from_hex(palette.primary[gradation]), factor, &mut rng);
    let secondary = perturb(Rgb::from_hex(palette.secondary[gradation]), factor, &mut rng);
    let accent = perturb(Rgb::from_hex(palette.accent[gradation]), factor, &mut rng);
    let outline = perturb(Rgb::from_hex(palette.outline[gradation]), factor, &mut rng);

    ColorScheme {
        primary,
        secondary,
        accent,
        outline,
        specular: primary.lighten(SPECULAR_BLEND),
    }
}

/// Shift each channel by up to `±20 · factor`, sign and magnitude drawn from
/// the stream.
fn perturb(color: Rgb, factor: f64, rng: &mut SeededRng) -> Rgb {
    let drift = MAX_CHANNEL_DRIFT * factor;
    let dr = rng.next_signed(1.0) * drift;
    let dg = rng.next_signed(1.0) * drift;
    let db = rng.next_signed(1.0) * drift;
    color.offset(dr, dg, db)
}
