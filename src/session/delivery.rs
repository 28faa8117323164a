//! Reinforcement delivery and its consequences
//!
//! Delivering a reinforcer strengthens the credited behavior, feeds
//! satiation and is logged. Punishment weakens the target instead.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{LabError, Result};
use crate::core::types::BehaviorClass;
use crate::intervention::Delivery;
use crate::session::animation::{AnimationCue, CueKind};
use crate::session::events::EventKind;
use crate::session::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReinforcerKind {
    Clicker,
    Treat,
    Praise,
}

impl ReinforcerKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReinforcerKind::Clicker => "clicker",
            ReinforcerKind::Treat => "treat",
            ReinforcerKind::Praise => "praise",
        }
    }
}

impl fmt::Display for ReinforcerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReinforcerKind {
    type Err = LabError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clicker" => Ok(ReinforcerKind::Clicker),
            "treat" => Ok(ReinforcerKind::Treat),
            "praise" => Ok(ReinforcerKind::Praise),
            other => Err(LabError::InvalidReinforcer(format!("unknown reinforcer '{}'", other))),
        }
    }
}

/// Reinforcer size, 1 to 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Magnitude {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Magnitude {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Magnitude {
    type Error = LabError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Magnitude::One),
            2 => Ok(Magnitude::Two),
            3 => Ok(Magnitude::Three),
            other => Err(LabError::InvalidReinforcer(format!(
                "magnitude must be 1, 2 or 3, got {}",
                other
            ))),
        }
    }
}

impl From<Magnitude> for u8 {
    fn from(m: Magnitude) -> u8 {
        m.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinforcerConfig {
    pub kind: ReinforcerKind,
    pub magnitude: Magnitude,
}

impl ReinforcerConfig {
    pub fn new(kind: ReinforcerKind, magnitude: Magnitude) -> Self {
        Self { kind, magnitude }
    }

    /// Reinforcement strength added to the credited behavior
    pub fn strength(&self, magnitude_scale: f64) -> f64 {
        self.magnitude.value() as f64 * magnitude_scale
    }
}

impl fmt::Display for ReinforcerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.kind, self.magnitude.value())
    }
}

impl FromStr for ReinforcerConfig {
    type Err = LabError;

    /// Parses "treat 2" or "clicker:3"
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split(|c: char| c == ' ' || c == ':' || c == 'x').filter(|p| !p.is_empty());
        let kind: ReinforcerKind = parts
            .next()
            .ok_or_else(|| LabError::InvalidReinforcer("empty reinforcer".into()))?
            .parse()?;
        let magnitude = match parts.next() {
            Some(m) => {
                let raw: u8 = m
                    .parse()
                    .map_err(|_| LabError::InvalidReinforcer(format!("bad magnitude '{}'", m)))?;
                Magnitude::try_from(raw)?
            }
            None => Magnitude::One,
        };
        Ok(Self { kind, magnitude })
    }
}

/// Apply a reinforcer chosen by the intervention policy
pub fn deliver<R: Rng + ?Sized>(state: &mut SessionState, delivery: Delivery, rng: &mut R) {
    let now = state.clock.time;
    let strength = state.reinforcer.strength(state.config.magnitude_scale);

    match delivery {
        Delivery::Alternative => {
            state.internal.reinforce(BehaviorClass::Alternative, strength);
            let spread = state.config.variable_spread;
            state.alt.reset(now, rng, spread);
        }
        Delivery::CurrentState { credited } => {
            if let Some(class) = credited {
                state.internal.reinforce(class, strength);
            }
        }
    }

    let details = match delivery {
        Delivery::Alternative => format!("Reinforced: alt behavior ({})", state.reinforcer.kind),
        Delivery::CurrentState { credited: Some(class) } => {
            format!("Reinforced on timer: {} behavior ({})", class, state.reinforcer.kind)
        }
        Delivery::CurrentState { credited: None } => {
            format!("Reinforced on timer: no behavior ({})", state.reinforcer.kind)
        }
    };
    apply_consequences(state, strength, details, delivery.credited());

    tracing::debug!(
        time = now,
        ?delivery,
        satiation = state.internal.satiation,
        "reinforcer delivered"
    );
}

/// Operator-forced reinforcement, bypassing schedules and the policy
pub fn deliver_manual(state: &mut SessionState, class: BehaviorClass) -> Result<()> {
    if state.clock.complete {
        return Err(LabError::SessionComplete);
    }

    let now = state.clock.time;
    let strength = state.reinforcer.strength(state.config.magnitude_scale);
    state.internal.reinforce(class, strength);
    apply_consequences(
        state,
        strength,
        format!("Manual reinforcement: {} behavior", class),
        Some(class),
    );
    state.cue = AnimationCue::new(CueKind::Reinforcement, now, state.config.manual_cue_duration);

    tracing::info!(time = now, %class, "manual reinforcement");
    Ok(())
}

/// Suppress the target behavior after a punisher
pub fn punish(state: &mut SessionState) {
    let now = state.clock.time;
    state.internal.recent_target -= state.config.punishment_suppression;
    state.events.record(
        now,
        EventKind::Punishment,
        "Punisher delivered",
        Some(BehaviorClass::Target),
    );
    tracing::debug!(time = now, recent_target = state.internal.recent_target, "punisher delivered");
}

fn apply_consequences(
    state: &mut SessionState,
    strength: f64,
    details: String,
    credited: Option<BehaviorClass>,
) {
    let now = state.clock.time;
    state.internal.satiate(strength, &state.config);
    state.counters.reinforcers_delivered += 1;
    state.events.record(now, EventKind::Reinforcement, details, credited);

    if state.internal.is_satiated(&state.config) {
        state
            .events
            .record(now, EventKind::Satiation, "Animal is getting satiated", None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Catalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state() -> SessionState {
        let catalog = Catalog::builtin();
        SessionState::initialize(catalog.find("jumping").unwrap(), 1)
    }

    #[test]
    fn test_strength_scales_magnitude() {
        let r = ReinforcerConfig::new(ReinforcerKind::Treat, Magnitude::Three);
        assert!((r.strength(0.2) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_alternative_delivery_resets_schedule() {
        let mut state = state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        state.alt.runtime.responses = 4;
        state.clock.time = 12.0;

        deliver(&mut state, Delivery::Alternative, &mut rng);

        // treat x2 => 0.4 strength
        assert!((state.internal.recent_alt - 0.4).abs() < 1e-12);
        assert!((state.internal.satiation - (0.2 + 0.4 * 0.05)).abs() < 1e-12);
        assert_eq!(state.alt.runtime.responses, 0);
        assert_eq!(state.alt.runtime.last_reinforcement, 12.0);
        assert_eq!(state.counters.reinforcers_delivered, 1);
        let last = state.events.as_slice().last().unwrap();
        assert_eq!(last.kind, EventKind::Reinforcement);
        assert_eq!(last.behavior, Some(BehaviorClass::Alternative));
    }

    #[test]
    fn test_timer_delivery_to_nothing_still_counts() {
        let mut state = state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        deliver(&mut state, Delivery::CurrentState { credited: None }, &mut rng);

        assert_eq!(state.internal.recent_alt, 0.0);
        assert_eq!(state.internal.recent_target, 0.0);
        assert_eq!(state.counters.reinforcers_delivered, 1);
        assert!(state.internal.satiation > 0.2);
        assert_eq!(state.events.as_slice().last().unwrap().behavior, None);
    }

    #[test]
    fn test_satiation_event_above_threshold() {
        let mut state = state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        state.internal.satiation = 0.69;
        deliver(&mut state, Delivery::Alternative, &mut rng);
        assert!(state.events.contains(EventKind::Satiation));
    }

    #[test]
    fn test_manual_reinforcement_targets_named_class() {
        let mut state = state();
        deliver_manual(&mut state, BehaviorClass::Target).unwrap();
        assert!((state.internal.recent_target - 0.4).abs() < 1e-12);
        assert_eq!(state.internal.recent_alt, 0.0);
        assert_eq!(state.cue.kind, CueKind::Reinforcement);
        assert_eq!(state.cue.duration, 1.0);
        assert_eq!(state.counters.reinforcers_delivered, 1);
    }

    #[test]
    fn test_manual_reinforcement_rejected_after_completion() {
        let mut state = state();
        state.clock.complete = true;
        assert!(matches!(
            deliver_manual(&mut state, BehaviorClass::Alternative),
            Err(LabError::SessionComplete)
        ));
        assert_eq!(state.counters.reinforcers_delivered, 0);
    }

    #[test]
    fn test_punish_suppresses_target() {
        let mut state = state();
        state.internal.recent_target = 0.1;
        punish(&mut state);
        assert!((state.internal.recent_target + 0.2).abs() < 1e-12);
        assert_eq!(state.counters.reinforcers_delivered, 0);
        assert!(state.events.contains(EventKind::Punishment));
    }

    #[test]
    fn test_parse_reinforcer() {
        let r: ReinforcerConfig = "treat 3".parse().unwrap();
        assert_eq!(r, ReinforcerConfig::new(ReinforcerKind::Treat, Magnitude::Three));
        let r: ReinforcerConfig = "clicker".parse().unwrap();
        assert_eq!(r.magnitude, Magnitude::One);
        assert!("treat 4".parse::<ReinforcerConfig>().is_err());
        assert!("steak 1".parse::<ReinforcerConfig>().is_err());
    }
}
