//! Engine configuration with documented constants
//!
//! Every tuned number in the behavioral model is collected here. The
//! emission coefficients in particular were fitted by eye so that an
//! untrained animal behaves every two to three seconds; treat them as
//! tunables, not as derived quantities.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{LabError, Result};

/// Configuration for the behavioral engine
///
/// A session keeps its own copy, so two sessions may run with different
/// tunings side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === CLOCK ===
    /// Fixed simulation step in seconds
    pub timestep: f64,

    /// Width of the sliding window used for rate samples (seconds)
    ///
    /// At 10s and a 0.1s step the window holds 100 occurrence flags.
    pub rate_window: f64,

    // === INITIAL STATE ===
    /// Motivation at session start
    pub initial_motivation: f64,

    /// Satiation at session start
    pub initial_satiation: f64,

    // === DECAY (applied once per tick) ===
    /// Multiplier on both recent-reinforcement accumulators
    pub recent_reinforcement_decay: f64,

    /// Multiplier on satiation
    ///
    /// At 0.999 satiation halves in roughly 700 ticks (70s), so a heavily
    /// reinforced animal stays full for most of a session.
    pub satiation_decay: f64,

    /// Multiplier on extinction-burst intensity
    ///
    /// At 0.95 a full burst falls below 0.5 after 14 ticks.
    pub burst_decay: f64,

    /// Motivation floor: MO = floor + span * (1 - SAT)
    pub motivation_floor: f64,

    /// Motivation span: MO = floor + span * (1 - SAT)
    pub motivation_span: f64,

    // === EMISSION ===
    /// Half-width of the uniform noise added to each propensity logit
    pub noise_amplitude: f64,

    pub target_bias: f64,
    pub target_motivation_weight: f64,
    pub target_recent_weight: f64,
    pub target_satiation_weight: f64,
    pub target_burst_weight: f64,

    pub alt_bias: f64,
    pub alt_recent_weight: f64,
    pub alt_motivation_weight: f64,

    /// Penalty on the alternative logit while the target carries any
    /// recent reinforcement
    pub competition_penalty: f64,

    /// Minimum target propensity regardless of history
    pub target_floor: f64,

    /// Minimum alternative propensity regardless of history
    pub alt_floor: f64,

    /// Scales propensity * timestep into a per-tick occurrence probability
    ///
    /// At 1.8 with the floors above, behaviors surface every 2-3 seconds.
    pub emission_multiplier: f64,

    // === REINFORCEMENT ===
    /// Reinforcement strength per magnitude step (magnitude 3 => 0.6)
    pub magnitude_scale: f64,

    /// Satiation added per unit of delivered strength
    pub satiation_gain: f64,

    /// Satiation above which a satiation event is logged and the animal
    /// looks sleepy
    pub satiation_threshold: f64,

    /// Amount subtracted from recent target reinforcement by a punisher
    pub punishment_suppression: f64,

    /// Recent target reinforcement below which extinction can burst
    pub burst_recent_threshold: f64,

    /// Burst intensity below which a new burst may trigger
    pub burst_retrigger_threshold: f64,

    /// Standard deviation of variable schedules relative to their mean
    pub variable_spread: f64,

    // === TIME-BASED INTERVENTIONS ===
    /// DRO interval when the alternative schedule carries no parameter
    pub default_dro_interval: f64,

    /// Fixed NCR delivery interval
    pub ncr_interval: f64,

    // === ANIMATION ===
    pub reinforcement_cue_duration: f64,
    pub behavior_cue_duration: f64,
    pub ambient_cue_duration: f64,
    pub manual_cue_duration: f64,

    // === SUMMARY ===
    /// Fraction of rate samples averaged at each end of the session
    pub summary_window_fraction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timestep: 0.1,
            rate_window: 10.0,

            initial_motivation: 0.6,
            initial_satiation: 0.2,

            recent_reinforcement_decay: 0.98,
            satiation_decay: 0.999,
            burst_decay: 0.95,
            motivation_floor: 0.2,
            motivation_span: 0.8,

            noise_amplitude: 0.1,
            target_bias: -0.5,
            target_motivation_weight: 1.5,
            target_recent_weight: 1.5,
            target_satiation_weight: 1.5,
            target_burst_weight: 3.0,
            alt_bias: -1.0,
            alt_recent_weight: 2.5,
            alt_motivation_weight: 0.8,
            competition_penalty: 0.3,
            target_floor: 0.35,
            alt_floor: 0.25,
            emission_multiplier: 1.8,

            magnitude_scale: 0.2,
            satiation_gain: 0.05,
            satiation_threshold: 0.7,
            punishment_suppression: 0.3,
            burst_recent_threshold: 0.1,
            burst_retrigger_threshold: 0.5,
            variable_spread: 0.3,

            default_dro_interval: 10.0,
            ncr_interval: 15.0,

            reinforcement_cue_duration: 1.5,
            behavior_cue_duration: 1.0,
            ambient_cue_duration: 2.0,
            manual_cue_duration: 1.0,

            summary_window_fraction: 0.2,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from TOML; keys left out keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Number of occurrence flags the rate window holds
    pub fn window_steps(&self) -> usize {
        ((self.rate_window / self.timestep).round() as usize).max(1)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.timestep > 0.0) {
            return Err(LabError::InvalidConfig(format!(
                "timestep ({}) must be positive",
                self.timestep
            )));
        }

        if self.rate_window < self.timestep {
            return Err(LabError::InvalidConfig(format!(
                "rate_window ({}) must be at least one timestep ({})",
                self.rate_window, self.timestep
            )));
        }

        let decays = [
            ("recent_reinforcement_decay", self.recent_reinforcement_decay),
            ("satiation_decay", self.satiation_decay),
            ("burst_decay", self.burst_decay),
        ];
        for (name, value) in decays {
            if !(value > 0.0 && value <= 1.0) {
                return Err(LabError::InvalidConfig(format!(
                    "{} ({}) must be in (0, 1]",
                    name, value
                )));
            }
        }

        let unit = [
            ("target_floor", self.target_floor),
            ("alt_floor", self.alt_floor),
            ("initial_motivation", self.initial_motivation),
            ("initial_satiation", self.initial_satiation),
            ("summary_window_fraction", self.summary_window_fraction),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(LabError::InvalidConfig(format!(
                    "{} ({}) must be in [0, 1]",
                    name, value
                )));
            }
        }

        if self.ncr_interval <= 0.0 || self.default_dro_interval <= 0.0 {
            return Err(LabError::InvalidConfig(
                "DRO and NCR intervals must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_window_steps() {
        let config = EngineConfig::default();
        assert_eq!(config.window_steps(), 100);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("emission_multiplier = 2.5\nncr_interval = 20.0\n").unwrap();
        assert_eq!(config.emission_multiplier, 2.5);
        assert_eq!(config.ncr_interval, 20.0);
        assert_eq!(config.timestep, 0.1);
        assert_eq!(config.alt_floor, 0.25);
    }

    #[test]
    fn test_rejects_non_positive_timestep() {
        let config = EngineConfig {
            timestep: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(LabError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_decay_above_one() {
        let err = EngineConfig::from_toml_str("burst_decay = 1.2").unwrap_err();
        assert!(err.to_string().contains("burst_decay"));
    }
}
