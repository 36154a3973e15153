//! Stage detection tuning

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::cycle::DEFAULT_ASSUMED_LENGTH_DAYS;
use crate::domain::stage::DEFAULT_FALLBACK_WINDOW_DAYS;

/// Stage detection tuning
///
/// Controls how far back the detector looks for a recently completed
/// milestone, and how long a cycle without a template is assumed to run
/// when computing day-ratio progress.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Days a completed milestone stays eligible as a fallback stage anchor
    #[serde(default = "default_fallback_window")]
    pub fallback_window_days: i64,

    /// Assumed cycle length when no template provides a total duration
    #[serde(default = "default_cycle_length")]
    pub default_cycle_length_days: i32,
}

impl DetectionConfig {
    /// Validate detection configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=60).contains(&self.fallback_window_days) {
            return Err(ValidationError::InvalidDetectionWindow);
        }
        if !(7..=90).contains(&self.default_cycle_length_days) {
            return Err(ValidationError::InvalidCycleLength);
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fallback_window_days: default_fallback_window(),
            default_cycle_length_days: default_cycle_length(),
        }
    }
}

fn default_fallback_window() -> i64 {
    DEFAULT_FALLBACK_WINDOW_DAYS
}

fn default_cycle_length() -> i32 {
    DEFAULT_ASSUMED_LENGTH_DAYS
}
