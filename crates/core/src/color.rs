//! RGB color values shared by palette and ornament styling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 8-bit-per-channel color.
///
/// Serializes as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Error returned when parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Input did not start with `#`.
    #[error("color `{0}` must start with '#'")]
    MissingHash(String),
    /// Input was not exactly six hex digits after the `#`.
    #[error("color `{0}` must have exactly 6 hex digits")]
    BadLength(String),
    /// Input contained a non-hex digit.
    #[error("color `{0}` contains a non-hex digit")]
    BadDigit(String),
}

impl Rgb {
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Construct from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Packed `0xRRGGBB` value.
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channels as an array.
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear blend toward `other`. `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| -> u8 {
            let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            clamp_channel(value.round())
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Blend toward white.
    pub fn lighten(self, t: f64) -> Self {
        self.lerp(Self::WHITE, t)
    }

    /// Blend toward black.
    pub fn darken(self, t: f64) -> Self {
        self.lerp(Self::BLACK, t)
    }

    /// Add per-channel offsets, saturating at the channel bounds.
    pub fn offset(self, dr: f64, dg: f64, db: f64) -> Self {
        Self::new(
            clamp_channel(f64::from(self.r) + dr.round()),
            clamp_channel(f64::from(self.g) + dg.round()),
            clamp_channel(f64::from(self.b) + db.round()),
        )
    }
}

/// Clamp a float channel value into `[0, 255]`. Non-finite values map to 0.
pub fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(input.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::BadLength(input.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::BadDigit(input.to_string()))?;
        Ok(Self::from_hex(packed))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_display_and_parse_agree() {
        let color = Rgb::from_hex(0x4A_7C_3F);
        assert_eq!(color.to_string(), "#4a7c3f");
        assert_eq!("#4a7c3f".parse::<Rgb>(), Ok(color));
        assert_eq!(color.to_hex(), 0x4A_7C_3F);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(matches!(
            "4a7c3f".parse::<Rgb>(),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            "#4a7c".parse::<Rgb>(),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            "#4a7czz".parse::<Rgb>(),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn lighten_moves_toward_white() {
        let base = Rgb::new(100, 0, 200);
        assert_eq!(base.lighten(0.0), base);
        assert_eq!(base.lighten(1.0), Rgb::WHITE);
        let half = base.lighten(0.5);
        assert_eq!(half, Rgb::new(178, 128, 228));
    }

    #[test]
    fn offset_saturates() {
        let color = Rgb::new(250, 5, 128).offset(20.0, -20.0, 0.4);
        assert_eq!(color, Rgb::new(255, 0, 128));
    }

    #[test]
    fn clamp_channel_handles_nan() {
        assert_eq!(clamp_channel(f64::NAN), 0);
        assert_eq!(clamp_channel(f64::INFINITY), 255);
        assert_eq!(clamp_channel(-3.0), 0);
    }
}
