//! Intervention policy
//!
//! Exactly one strategy is active at a time. Given which behavior occurred
//! this tick and whether each schedule is eligible, the policy decides what,
//! if anything, gets reinforced. DRO and NCR ignore schedules and run on
//! their own timers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::behavior::emission::Emission;
use crate::core::config::EngineConfig;
use crate::core::error::LabError;
use crate::core::types::{has_elapsed, BehaviorClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intervention {
    /// Differential reinforcement of alternative behavior
    #[serde(rename = "DRA")]
    Dra,
    /// Differential reinforcement of incompatible behavior
    #[serde(rename = "DRI")]
    Dri,
    /// Differential reinforcement of other behavior (absence of target)
    #[serde(rename = "DRO")]
    Dro,
    /// Non-contingent reinforcement on a fixed timer
    #[serde(rename = "NCR")]
    Ncr,
    Extinction,
    Punishment,
}

impl Intervention {
    pub fn all() -> &'static [Intervention] {
        &[
            Intervention::Dra,
            Intervention::Dri,
            Intervention::Dro,
            Intervention::Ncr,
            Intervention::Extinction,
            Intervention::Punishment,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intervention::Dra => "DRA",
            Intervention::Dri => "DRI",
            Intervention::Dro => "DRO",
            Intervention::Ncr => "NCR",
            Intervention::Extinction => "Extinction",
            Intervention::Punishment => "Punishment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Intervention::Dra => "Reinforce the alternative behavior on its schedule",
            Intervention::Dri => "Reinforce a behavior incompatible with the target",
            Intervention::Dro => "Reinforce any stretch without the target behavior",
            Intervention::Ncr => "Deliver reinforcement on a timer regardless of behavior",
            Intervention::Extinction => "Withhold all reinforcement",
            Intervention::Punishment => "Suppress the target behavior when its schedule allows",
        }
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intervention {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Intervention::all()
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "ext" => Some(Intervention::Extinction),
                "pun" => Some(Intervention::Punishment),
                _ => None,
            })
            .ok_or_else(|| LabError::UnknownIntervention(wanted.to_string()))
    }
}

/// Timers for the strategies that run on time rather than on schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionTimers {
    /// Seconds since the target behavior last occurred (or DRO last paid)
    pub dro: f64,
    pub dro_interval: f64,
    /// Seconds since NCR last paid
    pub ncr: f64,
    pub ncr_interval: f64,
}

impl InterventionTimers {
    pub fn new(dro_interval: f64, ncr_interval: f64) -> Self {
        Self {
            dro: 0.0,
            dro_interval,
            ncr: 0.0,
            ncr_interval,
        }
    }

    /// Advance both timers by one step
    ///
    /// Runs every tick whichever strategy is active, so switching to DRO
    /// mid-session credits the quiet time already accumulated.
    pub fn advance(&mut self, emission: Emission, dt: f64) {
        if emission.target() {
            self.dro = 0.0;
        } else {
            self.dro += dt;
        }
        self.ncr += dt;
    }
}

/// Where a delivered reinforcer lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delivery {
    /// Contingent on the alternative behavior; resets its schedule
    Alternative,
    /// Timer-driven (DRO/NCR): reinforces whatever the animal is doing
    ///
    /// `credited` names the class that happened to occur this tick, or
    /// `None` when the reinforcer landed on no behavior at all.
    CurrentState { credited: Option<BehaviorClass> },
}

impl Delivery {
    pub fn credited(&self) -> Option<BehaviorClass> {
        match self {
            Delivery::Alternative => Some(BehaviorClass::Alternative),
            Delivery::CurrentState { credited } => *credited,
        }
    }
}

/// Outcome of the policy for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Withhold,
    Deliver(Delivery),
    /// Punishment: suppress the target behavior
    Punish,
    /// Extinction: an unreinforced target response set off a burst
    Burst,
}

/// Everything the policy reads for one tick
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput {
    pub emission: Emission,
    pub target_eligible: bool,
    pub alt_eligible: bool,
    /// Burst may trigger (low recent target reinforcement, low BURST)
    pub burst_ready: bool,
}

/// Decide this tick's consequence
///
/// Timers are reset here when DRO or NCR pays out; advancing them is the
/// caller's job.
pub fn decide(intervention: Intervention, input: &PolicyInput, timers: &mut InterventionTimers) -> Decision {
    let emission = input.emission;
    match intervention {
        Intervention::Dra | Intervention::Dri => {
            if emission.alt() && input.alt_eligible {
                Decision::Deliver(Delivery::Alternative)
            } else {
                Decision::Withhold
            }
        }
        Intervention::Dro => {
            if has_elapsed(timers.dro, timers.dro_interval) {
                timers.dro = 0.0;
                Decision::Deliver(Delivery::CurrentState {
                    credited: credited_class(emission),
                })
            } else {
                Decision::Withhold
            }
        }
        Intervention::Ncr => {
            if has_elapsed(timers.ncr, timers.ncr_interval) {
                timers.ncr = 0.0;
                Decision::Deliver(Delivery::CurrentState {
                    credited: credited_class(emission),
                })
            } else {
                Decision::Withhold
            }
        }
        Intervention::Extinction => {
            if emission.target() && input.burst_ready {
                Decision::Burst
            } else {
                Decision::Withhold
            }
        }
        Intervention::Punishment => {
            if emission.target() && input.target_eligible {
                Decision::Punish
            } else {
                Decision::Withhold
            }
        }
    }
}

/// Only the alternative behavior gains strength from a timer-driven
/// reinforcer; a target response at the same moment is left uncredited.
fn credited_class(emission: Emission) -> Option<BehaviorClass> {
    emission.alt().then_some(BehaviorClass::Alternative)
}

/// DRO interval for a session: the alternative schedule's parameter, or
/// the configured default
pub fn dro_interval(alt_param: Option<f64>, config: &EngineConfig) -> f64 {
    alt_param
        .filter(|p| *p > 0.0)
        .unwrap_or(config.default_dro_interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(emission: Emission, target_eligible: bool, alt_eligible: bool) -> PolicyInput {
        PolicyInput {
            emission,
            target_eligible,
            alt_eligible,
            burst_ready: true,
        }
    }

    fn timers() -> InterventionTimers {
        InterventionTimers::new(5.0, 15.0)
    }

    #[test]
    fn test_dra_and_dri_share_mechanics() {
        for strategy in [Intervention::Dra, Intervention::Dri] {
            let mut t = timers();
            assert_eq!(
                decide(strategy, &input(Emission::ALT, false, true), &mut t),
                Decision::Deliver(Delivery::Alternative)
            );
            assert_eq!(decide(strategy, &input(Emission::ALT, true, false), &mut t), Decision::Withhold);
            assert_eq!(decide(strategy, &input(Emission::TARGET, true, true), &mut t), Decision::Withhold);
        }
    }

    #[test]
    fn test_dro_timer_resets_on_target() {
        let mut t = timers();
        for _ in 0..30 {
            t.advance(Emission::NONE, 0.1);
        }
        assert!((t.dro - 3.0).abs() < 1e-9);
        t.advance(Emission::TARGET, 0.1);
        assert_eq!(t.dro, 0.0);
    }

    #[test]
    fn test_dro_pays_after_interval_and_resets() {
        let mut t = timers();
        let mut deliveries = 0;
        for _ in 0..50 {
            t.advance(Emission::NONE, 0.1);
            if let Decision::Deliver(d) = decide(Intervention::Dro, &input(Emission::NONE, false, false), &mut t) {
                assert_eq!(d, Delivery::CurrentState { credited: None });
                deliveries += 1;
            }
        }
        assert_eq!(deliveries, 1);
        assert_eq!(t.dro, 0.0);
    }

    #[test]
    fn test_ncr_runs_regardless_of_behavior() {
        let mut t = timers();
        let mut deliveries = Vec::new();
        for i in 0..150 {
            let e = if i % 2 == 0 { Emission::TARGET } else { Emission::ALT };
            t.advance(e, 0.1);
            if let Decision::Deliver(d) = decide(Intervention::Ncr, &input(e, false, false), &mut t) {
                deliveries.push(d);
            }
        }
        assert_eq!(deliveries.len(), 1);
        // Tick 149 is odd, so the alternative was occurring at payout
        assert_eq!(
            deliveries[0],
            Delivery::CurrentState { credited: Some(BehaviorClass::Alternative) }
        );
    }

    #[test]
    fn test_extinction_never_delivers_but_bursts() {
        let mut t = timers();
        assert_eq!(decide(Intervention::Extinction, &input(Emission::ALT, true, true), &mut t), Decision::Withhold);
        assert_eq!(decide(Intervention::Extinction, &input(Emission::TARGET, true, true), &mut t), Decision::Burst);

        let mut cooled = input(Emission::TARGET, true, true);
        cooled.burst_ready = false;
        assert_eq!(decide(Intervention::Extinction, &cooled, &mut t), Decision::Withhold);
    }

    #[test]
    fn test_punishment_requires_target_eligibility() {
        let mut t = timers();
        assert_eq!(decide(Intervention::Punishment, &input(Emission::TARGET, true, false), &mut t), Decision::Punish);
        assert_eq!(decide(Intervention::Punishment, &input(Emission::TARGET, false, true), &mut t), Decision::Withhold);
        assert_eq!(decide(Intervention::Punishment, &input(Emission::ALT, true, true), &mut t), Decision::Withhold);
    }

    #[test]
    fn test_parse_intervention() {
        assert_eq!("dra".parse::<Intervention>().unwrap(), Intervention::Dra);
        assert_eq!("EXTINCTION".parse::<Intervention>().unwrap(), Intervention::Extinction);
        assert_eq!("ext".parse::<Intervention>().unwrap(), Intervention::Extinction);
        assert!(matches!("xyz".parse::<Intervention>(), Err(LabError::UnknownIntervention(_))));
    }

    #[test]
    fn test_dro_interval_fallback() {
        let config = EngineConfig::default();
        assert_eq!(dro_interval(Some(8.0), &config), 8.0);
        assert_eq!(dro_interval(None, &config), 10.0);
    }
}
