//! Emission model: internal state -> behavior occurrences
//!
//! Each tick the two propensities are computed from MO, SAT, BURST and the
//! recent-reinforcement traces, then one occurrence is sampled. The two
//! behaviors compete for the same timestep: the alternative is sampled
//! first and the target only gets a draw when the alternative stayed quiet.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::behavior::motivation::InternalState;
use crate::core::config::EngineConfig;
use crate::core::types::{sigmoid, BehaviorClass};

/// Floored per-second propensities for both behavior classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propensities {
    pub target: f64,
    pub alt: f64,
}

impl Propensities {
    /// Compute propensities with explicit logit noise
    pub fn compute(state: &InternalState, config: &EngineConfig, target_noise: f64, alt_noise: f64) -> Self {
        let target_raw = sigmoid(
            config.target_bias
                + config.target_motivation_weight * state.motivation
                + config.target_recent_weight * state.recent_target
                - config.target_satiation_weight * state.satiation
                + config.target_burst_weight * state.burst
                + target_noise,
        );

        let competition = if state.recent_target > 0.0 {
            config.competition_penalty
        } else {
            0.0
        };
        let alt_raw = sigmoid(
            config.alt_bias + config.alt_recent_weight * state.recent_alt - competition
                + config.alt_motivation_weight * state.motivation
                + alt_noise,
        );

        Self {
            target: target_raw.max(config.target_floor),
            alt: alt_raw.max(config.alt_floor),
        }
    }

    /// Compute propensities with fresh uniform noise for each logit
    pub fn sample<R: Rng + ?Sized>(state: &InternalState, config: &EngineConfig, rng: &mut R) -> Self {
        let target_noise = logit_noise(rng, config.noise_amplitude);
        let alt_noise = logit_noise(rng, config.noise_amplitude);
        Self::compute(state, config, target_noise, alt_noise)
    }

    /// Per-tick occurrence probability for a class
    pub fn per_tick(&self, class: BehaviorClass, dt: f64, config: &EngineConfig) -> f64 {
        let p = match class {
            BehaviorClass::Target => self.target,
            BehaviorClass::Alternative => self.alt,
        };
        (p * dt * config.emission_multiplier).min(1.0)
    }
}

fn logit_noise<R: Rng + ?Sized>(rng: &mut R, amplitude: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * 2.0 * amplitude
}

/// Which behavior occurred in a tick; at most one flag is ever set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Emission {
    target: bool,
    alt: bool,
}

impl Emission {
    pub const NONE: Emission = Emission { target: false, alt: false };
    pub const TARGET: Emission = Emission { target: true, alt: false };
    pub const ALT: Emission = Emission { target: false, alt: true };

    pub fn of(class: BehaviorClass) -> Self {
        match class {
            BehaviorClass::Target => Self::TARGET,
            BehaviorClass::Alternative => Self::ALT,
        }
    }

    pub fn target(&self) -> bool {
        self.target
    }

    pub fn alt(&self) -> bool {
        self.alt
    }

    pub fn occurred(&self, class: BehaviorClass) -> bool {
        match class {
            BehaviorClass::Target => self.target,
            BehaviorClass::Alternative => self.alt,
        }
    }

    /// The class that occurred, if any
    pub fn class(&self) -> Option<BehaviorClass> {
        if self.alt {
            Some(BehaviorClass::Alternative)
        } else if self.target {
            Some(BehaviorClass::Target)
        } else {
            None
        }
    }

    /// Sample one tick's occurrence from the given propensities
    pub fn sample<R: Rng + ?Sized>(
        propensities: &Propensities,
        dt: f64,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Self {
        let p_alt = propensities.per_tick(BehaviorClass::Alternative, dt, config);
        if rng.gen::<f64>() < p_alt {
            return Self::ALT;
        }
        let p_target = propensities.per_tick(BehaviorClass::Target, dt, config);
        if rng.gen::<f64>() < p_target {
            return Self::TARGET;
        }
        Self::NONE
    }
}

/// Run the full emission step for one tick
pub fn emit<R: Rng + ?Sized>(state: &InternalState, config: &EngineConfig, rng: &mut R) -> Emission {
    let propensities = Propensities::sample(state, config, rng);
    tracing::trace!(
        p_target = propensities.target,
        p_alt = propensities.alt,
        "emission propensities"
    );
    Emission::sample(&propensities, config.timestep, config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn calm_state() -> InternalState {
        InternalState {
            motivation: 0.0,
            satiation: 1.0,
            burst: 0.0,
            recent_target: 0.5,
            recent_alt: 0.0,
        }
    }

    #[test]
    fn test_floors_apply() {
        let config = EngineConfig::default();
        let p = Propensities::compute(&calm_state(), &config, 0.0, 0.0);
        assert_eq!(p.target, 0.35);
        assert_eq!(p.alt, 0.25);
    }

    #[test]
    fn test_burst_raises_target_propensity() {
        let config = EngineConfig::default();
        let base = InternalState::new(&config);
        let mut bursting = base.clone();
        bursting.burst = 1.0;

        let calm = Propensities::compute(&base, &config, 0.0, 0.0);
        let hot = Propensities::compute(&bursting, &config, 0.0, 0.0);
        assert!(hot.target > calm.target);
        assert_eq!(hot.alt, calm.alt);
    }

    #[test]
    fn test_target_reinforcement_penalizes_alt() {
        let config = EngineConfig::default();
        let mut state = InternalState::new(&config);
        state.recent_alt = 1.0;
        let free = Propensities::compute(&state, &config, 0.0, 0.0);
        state.recent_target = 0.01;
        let competing = Propensities::compute(&state, &config, 0.0, 0.0);
        assert!(competing.alt < free.alt);
    }

    #[test]
    fn test_per_tick_probability_caps_at_one() {
        let config = EngineConfig::default();
        let p = Propensities { target: 0.9, alt: 0.9 };
        assert!((p.per_tick(BehaviorClass::Target, 0.1, &config) - 0.162).abs() < 1e-12);
        assert_eq!(p.per_tick(BehaviorClass::Alternative, 10.0, &config), 1.0);
    }

    #[test]
    fn test_low_draws_favor_alternative() {
        // A zero draw passes every threshold; the alternative is sampled first
        let config = EngineConfig::default();
        let p = Propensities { target: 0.9, alt: 0.3 };
        let mut rng = StepRng::new(0, 0);
        assert_eq!(Emission::sample(&p, 0.1, &config, &mut rng), Emission::ALT);
    }

    #[test]
    fn test_high_draws_emit_nothing() {
        let config = EngineConfig::default();
        let p = Propensities { target: 0.9, alt: 0.9 };
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(Emission::sample(&p, 0.1, &config, &mut rng), Emission::NONE);
    }

    #[test]
    fn test_emissions_never_overlap() {
        let config = EngineConfig::default();
        let state = InternalState::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen_target = false;
        let mut seen_alt = false;
        for _ in 0..5_000 {
            let e = emit(&state, &config, &mut rng);
            assert!(!(e.target() && e.alt()));
            seen_target |= e.target();
            seen_alt |= e.alt();
        }
        assert!(seen_target && seen_alt);
    }

    #[test]
    fn test_emission_class() {
        assert_eq!(Emission::TARGET.class(), Some(BehaviorClass::Target));
        assert_eq!(Emission::ALT.class(), Some(BehaviorClass::Alternative));
        assert_eq!(Emission::NONE.class(), None);
        assert_eq!(Emission::of(BehaviorClass::Target), Emission::TARGET);
    }
}
