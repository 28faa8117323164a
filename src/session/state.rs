//! The session state aggregate

use serde::{Deserialize, Serialize};

use crate::behavior::motivation::InternalState;
use crate::core::config::EngineConfig;
use crate::core::types::{BehaviorClass, SimTime, TIME_EPSILON};
use crate::intervention::{dro_interval, Intervention, InterventionTimers};
use crate::scenario::Scenario;
use crate::schedule::BehaviorSchedule;
use crate::session::animation::AnimationCue;
use crate::session::delivery::ReinforcerConfig;
use crate::session::events::EventLog;
use crate::session::rates::RateTracker;

/// Simulated clock
///
/// Time is derived from the integer step count so that long sessions do
/// not accumulate floating-point drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub time: SimTime,
    pub step: u64,
    pub timestep: f64,
    /// Planned session length in seconds
    pub duration: f64,
    pub paused: bool,
    pub complete: bool,
}

impl Clock {
    pub fn new(timestep: f64, duration: f64) -> Self {
        Self {
            time: 0.0,
            step: 0,
            timestep,
            duration,
            paused: false,
            complete: false,
        }
    }

    /// Ticks needed for simulated time to reach the session duration
    ///
    /// A duration that falls between two ticks runs to the later one.
    pub fn total_steps(&self) -> u64 {
        ((self.duration / self.timestep) - TIME_EPSILON).ceil().max(1.0) as u64
    }

    /// Time of the tick before the current one (negative at step 0)
    pub fn previous_time(&self) -> SimTime {
        (self.step as f64 - 1.0) * self.timestep
    }

    pub fn advance(&mut self) {
        self.step += 1;
        self.time = self.step as f64 * self.timestep;
    }

    pub fn remaining(&self) -> f64 {
        (self.duration - self.time).max(0.0)
    }

    /// Fraction of the session already run, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        (self.step as f64 / self.total_steps() as f64).min(1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub target_occurrences: u32,
    pub alt_occurrences: u32,
    pub reinforcers_delivered: u32,
}

impl Counters {
    pub fn record(&mut self, class: BehaviorClass) {
        match class {
            BehaviorClass::Target => self.target_occurrences += 1,
            BehaviorClass::Alternative => self.alt_occurrences += 1,
        }
    }

    pub fn occurrences(&self, class: BehaviorClass) -> u32 {
        match class {
            BehaviorClass::Target => self.target_occurrences,
            BehaviorClass::Alternative => self.alt_occurrences,
        }
    }
}

/// Everything one training session mutates
///
/// Owned by whoever drives the session. Only `tick` and the mutators in
/// `session::control` write to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_number: u32,
    pub scenario_id: String,
    pub clock: Clock,
    pub internal: InternalState,
    pub target: BehaviorSchedule,
    pub alt: BehaviorSchedule,
    pub reinforcer: ReinforcerConfig,
    pub intervention: Intervention,
    pub timers: InterventionTimers,
    pub counters: Counters,
    pub rates: RateTracker,
    pub events: EventLog,
    pub cue: AnimationCue,
    pub config: EngineConfig,
}

impl SessionState {
    /// Fresh state for a scenario with the stock engine constants
    pub fn initialize(scenario: &Scenario, session_number: u32) -> Self {
        Self::with_config(scenario, session_number, EngineConfig::default())
    }

    /// Fresh state for a scenario with custom engine constants
    pub fn with_config(scenario: &Scenario, session_number: u32, config: EngineConfig) -> Self {
        let defaults = &scenario.defaults;
        let timers = InterventionTimers::new(
            dro_interval(defaults.alt_schedule.param, &config),
            config.ncr_interval,
        );

        tracing::info!(
            scenario = %scenario.id,
            session = session_number,
            intervention = %defaults.intervention,
            target_schedule = %defaults.target_schedule,
            alt_schedule = %defaults.alt_schedule,
            duration = defaults.session_duration,
            "session initialized"
        );

        Self {
            session_number,
            scenario_id: scenario.id.clone(),
            clock: Clock::new(config.timestep, defaults.session_duration),
            internal: InternalState::new(&config),
            target: BehaviorSchedule::new(defaults.target_schedule),
            alt: BehaviorSchedule::new(defaults.alt_schedule),
            reinforcer: defaults.reinforcer,
            intervention: defaults.intervention,
            timers,
            counters: Counters::default(),
            rates: RateTracker::new(config.window_steps()),
            events: EventLog::new(),
            cue: AnimationCue::default(),
            config,
        }
    }

    pub fn schedule(&self, class: BehaviorClass) -> &BehaviorSchedule {
        match class {
            BehaviorClass::Target => &self.target,
            BehaviorClass::Alternative => &self.alt,
        }
    }

    pub fn schedule_mut(&mut self, class: BehaviorClass) -> &mut BehaviorSchedule {
        match class {
            BehaviorClass::Target => &mut self.target,
            BehaviorClass::Alternative => &mut self.alt,
        }
    }

    /// Will the next tick do anything?
    pub fn is_active(&self) -> bool {
        !self.clock.paused && !self.clock.complete
    }

    pub fn is_complete(&self) -> bool {
        self.clock.complete
    }
}
