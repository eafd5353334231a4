//! Owner activity used for cosmetic scaling.
//!
//! Activity only changes levels, scales and glow of already placed
//! instances. It never consumes values from a seeded stream, so positions,
//! counts and colors are the same with or without it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest building level.
pub const MAX_BUILDING_LEVEL: u32 = 5;

const NFT_SCALE_CAP: u32 = 20;
const NFT_SCALE_GAIN: f64 = 0.5;
const STAKE_GLOW_DECADES: f64 = 4.0;

/// Activity record supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryActivity {
    pub balance: f64,
    pub nft_count: u32,
    pub transaction_count: u32,
    pub staked_amount: f64,
    pub last_update: Option<DateTime<Utc>>,
}

impl TerritoryActivity {
    /// `floor(log10(balance + 1))`, clamped to `[1, 5]`.
    pub fn building_level(&self) -> u32 {
        let level = decades(self.balance).floor() as u32;
        level.clamp(1, MAX_BUILDING_LEVEL)
    }

    /// Extra floors from transaction volume, at most 2.
    pub fn floor_bonus(&self) -> u32 {
        (decades(f64::from(self.transaction_count)).floor() as u32).min(2)
    }

    /// Treasure scale multiplier in `[1, 1.5]`.
    pub fn treasure_scale(&self) -> f64 {
        let held = self.nft_count.min(NFT_SCALE_CAP);
        1.0 + f64::from(held) / f64::from(NFT_SCALE_CAP) * NFT_SCALE_GAIN
    }

    /// Additional treasure glow in `[0, 1]`.
    pub fn glow_boost(&self) -> f64 {
        (decades(self.staked_amount) / STAKE_GLOW_DECADES).min(1.0)
    }
}

/// `log10(value + 1)` for finite non-negative values, 0 otherwise.
fn decades(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        (value + 1.0).log10()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn with_balance(balance: f64) -> TerritoryActivity {
        TerritoryActivity {
            balance,
            ..TerritoryActivity::default()
        }
    }

    #[test]
    fn building_level_follows_log_balance() {
        assert_eq!(with_balance(0.0).building_level(), 1);
        assert_eq!(with_balance(99.0).building_level(), 2);
        assert_eq!(with_balance(999.0).building_level(), 3);
        assert_eq!(with_balance(1e12).building_level(), MAX_BUILDING_LEVEL);
        assert_eq!(with_balance(f64::NAN).building_level(), 1);
        assert_eq!(with_balance(-50.0).building_level(), 1);
    }

    #[test]
    fn treasure_scale_is_capped() {
        let mut activity = TerritoryActivity::default();
        assert_eq!(activity.treasure_scale(), 1.0);
        activity.nft_count = 10;
        assert!((activity.treasure_scale() - 1.25).abs() < 1e-12);
        activity.nft_count = 500;
        assert!((activity.treasure_scale() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn glow_and_floors_are_bounded() {
        let activity = TerritoryActivity {
            staked_amount: 1e9,
            transaction_count: 1_000_000,
            ..TerritoryActivity::default()
        };
        assert_eq!(activity.glow_boost(), 1.0);
        assert_eq!(activity.floor_bonus(), 2);
    }

    #[test]
    fn timestamp_roundtrips_through_json() {
        let activity = TerritoryActivity {
            last_update: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            ..with_balance(42.0)
        };
        let json = serde_json::to_string(&activity).unwrap();
        assert!(json.contains("2024-05-01T12:00:00Z"));
        let back: TerritoryActivity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, activity);
    }
}
