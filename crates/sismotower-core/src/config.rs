//! Game rules loaded once at startup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable rules. `Default` is the shipped configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Number of floors for per-floor components.
    pub floors: usize,
    pub min_floor_area: f64,
    pub max_floor_area: f64,
    pub default_floor_area: f64,
    /// Intensity multipliers dealt out across the three waves, one each.
    pub wave_intensities: [f64; 3],
    /// Aggregate health strictly below this collapses the building.
    pub collapse_threshold: f64,
    /// Delay between entering a wave phase and its damage being committed.
    pub wave_resolution_delay_ms: u64,
    /// Delay between a collapse and the results phase.
    pub collapse_results_delay_ms: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            floors: 7,
            min_floor_area: 50.0,
            max_floor_area: 200.0,
            default_floor_area: 100.0,
            wave_intensities: [0.6, 0.8, 1.0],
            collapse_threshold: 20.0,
            wave_resolution_delay_ms: 2000,
            collapse_results_delay_ms: 2500,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("floors must be at least 1 (got {0})")]
    NoFloors(usize),
    #[error("floor area range {min:.1}..={max:.1} is empty or not positive")]
    InvalidAreaRange { min: f64, max: f64 },
    #[error("default floor area {value:.1} is outside {min:.1}..={max:.1}")]
    DefaultAreaOutOfRange { value: f64, min: f64, max: f64 },
    #[error("wave intensity {0} must be a finite positive number")]
    InvalidIntensity(f64),
    #[error("collapse threshold {0} must be within 0..=100")]
    InvalidCollapseThreshold(f64),
}

impl GameRules {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let rules: GameRules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floors == 0 {
            return Err(ConfigError::NoFloors(self.floors));
        }
        if !(self.min_floor_area > 0.0 && self.min_floor_area <= self.max_floor_area)
            || !self.max_floor_area.is_finite()
        {
            return Err(ConfigError::InvalidAreaRange {
                min: self.min_floor_area,
                max: self.max_floor_area,
            });
        }
        if !(self.min_floor_area..=self.max_floor_area).contains(&self.default_floor_area) {
            return Err(ConfigError::DefaultAreaOutOfRange {
                value: self.default_floor_area,
                min: self.min_floor_area,
                max: self.max_floor_area,
            });
        }
        if let Some(&bad) = self
            .wave_intensities
            .iter()
            .find(|i| !(i.is_finite() && **i > 0.0))
        {
            return Err(ConfigError::InvalidIntensity(bad));
        }
        if !(0.0..=100.0).contains(&self.collapse_threshold) {
            return Err(ConfigError::InvalidCollapseThreshold(
                self.collapse_threshold,
            ));
        }
        Ok(())
    }

    /// Clamp a requested floor area into the allowed range.
    pub fn clamp_floor_area(&self, area: f64) -> f64 {
        if area.is_nan() {
            return self.default_floor_area;
        }
        area.clamp(self.min_floor_area, self.max_floor_area)
    }
}
