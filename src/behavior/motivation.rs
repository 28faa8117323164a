//! Internal motivational variables of the animal

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::types::{clamp01, BehaviorClass};

/// State variables that drive emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalState {
    /// MO, 0.0 = indifferent, 1.0 = eager. Derived from satiation each tick.
    pub motivation: f64,
    /// SAT, 0.0 = hungry, 1.0 = full
    pub satiation: f64,
    /// BURST, transient intensity after withheld reinforcement
    pub burst: f64,
    /// Decaying trace of reinforcement credited to the target behavior
    ///
    /// Unbounded; punishment can push it below zero.
    pub recent_target: f64,
    /// Decaying trace of reinforcement credited to the alternative behavior
    pub recent_alt: f64,
}

impl InternalState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            motivation: clamp01(config.initial_motivation),
            satiation: clamp01(config.initial_satiation),
            burst: 0.0,
            recent_target: 0.0,
            recent_alt: 0.0,
        }
    }

    /// Exponential relaxation toward baseline (called each tick)
    ///
    /// Motivation is re-derived from satiation rather than decayed, so an
    /// operator override only lasts until the next tick.
    pub fn decay(&mut self, config: &EngineConfig) {
        self.recent_target *= config.recent_reinforcement_decay;
        self.recent_alt *= config.recent_reinforcement_decay;
        self.satiation = clamp01(self.satiation * config.satiation_decay);
        self.motivation =
            clamp01(config.motivation_floor + config.motivation_span * (1.0 - self.satiation));
        self.burst = clamp01(self.burst * config.burst_decay);
    }

    pub fn recent(&self, class: BehaviorClass) -> f64 {
        match class {
            BehaviorClass::Target => self.recent_target,
            BehaviorClass::Alternative => self.recent_alt,
        }
    }

    /// Credit reinforcement strength to a behavior class
    pub fn reinforce(&mut self, class: BehaviorClass, strength: f64) {
        match class {
            BehaviorClass::Target => self.recent_target += strength,
            BehaviorClass::Alternative => self.recent_alt += strength,
        }
    }

    /// Raise satiation after a delivery; returns the new level
    pub fn satiate(&mut self, strength: f64, config: &EngineConfig) -> f64 {
        self.satiation = clamp01(self.satiation + strength * config.satiation_gain);
        self.satiation
    }

    pub fn is_satiated(&self, config: &EngineConfig) -> bool {
        self.satiation > config.satiation_threshold
    }

    pub fn is_bursting(&self, config: &EngineConfig) -> bool {
        self.burst > config.burst_retrigger_threshold
    }

    /// Can an unreinforced target response start an extinction burst?
    pub fn burst_ready(&self, config: &EngineConfig) -> bool {
        self.recent_target < config.burst_recent_threshold
            && self.burst < config.burst_retrigger_threshold
    }

    pub fn start_burst(&mut self) {
        self.burst = 1.0;
    }

    /// Re-apply the unit-interval bounds on MO, SAT and BURST
    pub fn clamp(&mut self) {
        self.motivation = clamp01(self.motivation);
        self.satiation = clamp01(self.satiation);
        self.burst = clamp01(self.burst);
    }
}
