//! Codec configuration
//!
//! Controls how strictly input is dispatched and the numeric floors used
//! by validation. Deserializable so tools can load it from a file:
//!
//! ```yaml
//! profile: strict
//! probability_tolerance: 1.0e-5
//! ```

use serde::{Deserialize, Serialize};

/// How the dispatcher treats unrecognized input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Unknown section tags and stray lines are skipped with a warning.
    #[default]
    Lenient,
    /// Unknown section tags and stray lines are errors.
    Strict,
}

/// Reader and validator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub profile: Profile,

    /// Absolute deviation from one allowed when a recruitment probability row is summed.
    pub probability_tolerance: f64,

    /// Smallest value accepted in empirical recruitment observations.
    pub empirical_floor: f64,

    /// Smallest value accepted for parametric recruitment parameters.
    pub parametric_floor: f64,

    /// Upper bound on predictor-model predictor counts.
    pub max_predictors: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            probability_tolerance: 1e-5,
            empirical_floor: 1e-4,
            parametric_floor: 1e-9,
            max_predictors: 5,
        }
    }
}

impl CodecConfig {
    pub fn strict() -> Self {
        Self {
            profile: Profile::Strict,
            ..Self::default()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.profile == Profile::Strict
    }

    /// Whether `sum` lies within the configured absolute tolerance of one.
    pub fn is_normalized(&self, sum: f64) -> bool {
        (sum - 1.0).abs() <= self.probability_tolerance
    }
}
