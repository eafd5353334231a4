//! Generation settings.
//!
//! Settings are inputs of a generation call: the same settings and spec always
//! produce the same model.

use serde::{Deserialize, Serialize};

/// Tunables for the placement stage and spec sanitation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Candidate anchors tried per terrain feature before it is skipped.
    pub max_anchor_attempts: u32,
    /// Extra spacing between terrain features, as a fraction of size.
    pub feature_clearance: f64,
    /// Size used when a spec carries a non-finite or non-positive size.
    pub default_size: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_anchor_attempts: 12,
            feature_clearance: 0.15,
            default_size: 8.0,
        }
    }
}

impl GenerationSettings {
    /// Copy with out-of-range values pulled back to usable ones.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            max_anchor_attempts: self.max_anchor_attempts.clamp(1, 1_000),
            feature_clearance: if self.feature_clearance.is_finite() {
                self.feature_clearance.clamp(0.0, 1.0)
            } else {
                defaults.feature_clearance
            },
            default_size: if self.default_size.is_finite() && self.default_size > 0.0 {
                self.default_size
            } else {
                defaults.default_size
            },
        }
    }
}
