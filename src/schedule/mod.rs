//! Reinforcement schedules
//!
//! A schedule decides whether a response currently qualifies for
//! reinforcement. Each behavior class owns one `ScheduleConfig` (what the
//! trainer chose) and one `ScheduleRuntime` (counters that move as the
//! session runs).

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::LabError;
use crate::core::types::{has_elapsed, sample_normal, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleKind {
    /// CRF: every response is reinforced
    #[serde(rename = "CRF")]
    Continuous,
    /// EXT: no response is reinforced
    #[serde(rename = "EXT")]
    Extinction,
    #[serde(rename = "FR")]
    FixedRatio,
    #[serde(rename = "VR")]
    VariableRatio,
    #[serde(rename = "FI")]
    FixedInterval,
    #[serde(rename = "VI")]
    VariableInterval,
}

impl ScheduleKind {
    pub fn all() -> &'static [ScheduleKind] {
        &[
            ScheduleKind::Continuous,
            ScheduleKind::Extinction,
            ScheduleKind::FixedRatio,
            ScheduleKind::VariableRatio,
            ScheduleKind::FixedInterval,
            ScheduleKind::VariableInterval,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            ScheduleKind::Continuous => "CRF",
            ScheduleKind::Extinction => "EXT",
            ScheduleKind::FixedRatio => "FR",
            ScheduleKind::VariableRatio => "VR",
            ScheduleKind::FixedInterval => "FI",
            ScheduleKind::VariableInterval => "VI",
        }
    }

    pub fn is_ratio(&self) -> bool {
        matches!(self, ScheduleKind::FixedRatio | ScheduleKind::VariableRatio)
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, ScheduleKind::FixedInterval | ScheduleKind::VariableInterval)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, ScheduleKind::VariableRatio | ScheduleKind::VariableInterval)
    }

    /// Parameter used when the configuration leaves it out
    pub fn default_param(&self) -> Option<f64> {
        match self {
            ScheduleKind::FixedRatio => Some(1.0),
            ScheduleKind::VariableRatio => Some(5.0),
            ScheduleKind::FixedInterval | ScheduleKind::VariableInterval => Some(10.0),
            ScheduleKind::Continuous | ScheduleKind::Extinction => None,
        }
    }

    /// Range the trainer-facing controls accept
    ///
    /// The engine itself takes any positive number; only the operator
    /// surfaces enforce this.
    pub fn accepted_range(&self) -> Option<RangeInclusive<f64>> {
        if self.is_ratio() {
            Some(1.0..=20.0)
        } else if self.is_interval() {
            Some(1.0..=60.0)
        } else {
            None
        }
    }
}

impl FromStr for ScheduleKind {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        ScheduleKind::all()
            .iter()
            .copied()
            .find(|k| k.code() == code)
            .ok_or_else(|| LabError::InvalidSchedule(format!("unknown schedule kind '{}'", s.trim())))
    }
}

/// A schedule as configured by the trainer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub kind: ScheduleKind,
    /// Count for ratio kinds, seconds for interval kinds, mean for variable kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<f64>,
}

impl ScheduleConfig {
    pub fn new(kind: ScheduleKind, param: Option<f64>) -> Self {
        Self { kind, param }
    }

    pub fn continuous() -> Self {
        Self::new(ScheduleKind::Continuous, None)
    }

    pub fn extinction() -> Self {
        Self::new(ScheduleKind::Extinction, None)
    }

    pub fn fixed_ratio(n: u32) -> Self {
        Self::new(ScheduleKind::FixedRatio, Some(n as f64))
    }

    pub fn variable_ratio(mean: f64) -> Self {
        Self::new(ScheduleKind::VariableRatio, Some(mean))
    }

    pub fn fixed_interval(seconds: f64) -> Self {
        Self::new(ScheduleKind::FixedInterval, Some(seconds))
    }

    pub fn variable_interval(mean: f64) -> Self {
        Self::new(ScheduleKind::VariableInterval, Some(mean))
    }

    /// Parameter with the kind's default filled in (0 for CRF/EXT)
    pub fn effective_param(&self) -> f64 {
        self.param
            .filter(|p| *p > 0.0)
            .or_else(|| self.kind.default_param())
            .unwrap_or(0.0)
    }

    /// Draw a fresh requirement for variable kinds
    ///
    /// VR rounds to a whole response count; both kinds never go below 1.
    pub fn draw_requirement<R: Rng + ?Sized>(&self, rng: &mut R, spread: f64) -> Requirement {
        let mean = self.effective_param();
        match self.kind {
            ScheduleKind::VariableRatio => {
                let draw = sample_normal(rng, mean, mean * spread).round();
                Requirement::Resolved(draw.max(1.0))
            }
            ScheduleKind::VariableInterval => {
                let draw = sample_normal(rng, mean, mean * spread);
                Requirement::Resolved(draw.max(1.0))
            }
            _ => Requirement::Unresolved,
        }
    }
}

impl fmt::Display for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.default_param() {
            Some(_) => write!(f, "{} {}", self.kind.code(), self.effective_param()),
            None => f.write_str(self.kind.code()),
        }
    }
}

impl FromStr for ScheduleConfig {
    type Err = LabError;

    /// Parses "CRF", "EXT", "FR 5", "VI:8" or "vr3"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit() || c == '.' || c == ' ' || c == ':')
            .unwrap_or(trimmed.len());
        let (code, rest) = trimmed.split_at(split);
        let kind: ScheduleKind = code.parse()?;
        let rest = rest.trim_start_matches([' ', ':']).trim();

        let param = if rest.is_empty() {
            None
        } else {
            let value: f64 = rest
                .parse()
                .map_err(|_| LabError::InvalidSchedule(format!("bad parameter '{}'", rest)))?;
            if value <= 0.0 {
                return Err(LabError::InvalidSchedule(format!(
                    "parameter must be positive, got {}",
                    value
                )));
            }
            Some(value)
        };

        Ok(ScheduleConfig { kind, param })
    }
}

/// Resolved requirement of a variable schedule
///
/// `Unresolved` means "draw one before the next eligibility check"; a
/// resolved zero would instead mean every check passes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Requirement {
    #[default]
    Unresolved,
    /// Responses (VR) or seconds (VI)
    Resolved(f64),
}

impl Requirement {
    pub fn value(&self) -> Option<f64> {
        match self {
            Requirement::Unresolved => None,
            Requirement::Resolved(v) => Some(*v),
        }
    }
}

/// Mutable schedule counters for one behavior class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRuntime {
    /// Responses since the last delivery on this schedule
    pub responses: u32,
    pub last_reinforcement: SimTime,
    pub requirement: Requirement,
}

impl ScheduleRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one response, whether or not this schedule governs delivery
    pub fn mark_response(&mut self) {
        self.responses += 1;
    }

    /// Is a response at `now` eligible for reinforcement?
    ///
    /// Variable kinds resolve their requirement on first use and keep it
    /// until the next `reset`.
    pub fn is_eligible<R: Rng + ?Sized>(
        &mut self,
        config: &ScheduleConfig,
        now: SimTime,
        rng: &mut R,
        spread: f64,
    ) -> bool {
        match config.kind {
            ScheduleKind::Continuous => true,
            ScheduleKind::Extinction => false,
            ScheduleKind::FixedRatio => self.responses as f64 >= config.effective_param(),
            ScheduleKind::FixedInterval => {
                has_elapsed(now - self.last_reinforcement, config.effective_param())
            }
            ScheduleKind::VariableRatio => {
                let required = self.resolve(config, rng, spread);
                self.responses as f64 >= required
            }
            ScheduleKind::VariableInterval => {
                let required = self.resolve(config, rng, spread);
                has_elapsed(now - self.last_reinforcement, required)
            }
        }
    }

    /// Restart the schedule after it delivered at `now`
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        config: &ScheduleConfig,
        now: SimTime,
        rng: &mut R,
        spread: f64,
    ) {
        self.responses = 0;
        self.last_reinforcement = now;
        self.requirement = config.draw_requirement(rng, spread);
    }

    /// Forget progress after the trainer swaps the schedule
    ///
    /// The last reinforcement time is kept, so interval schedules still
    /// measure from the previous delivery.
    pub fn clear(&mut self) {
        self.responses = 0;
        self.requirement = Requirement::Unresolved;
    }

    fn resolve<R: Rng + ?Sized>(&mut self, config: &ScheduleConfig, rng: &mut R, spread: f64) -> f64 {
        if let Requirement::Resolved(v) = self.requirement {
            return v;
        }
        self.requirement = config.draw_requirement(rng, spread);
        self.requirement.value().unwrap_or(1.0)
    }
}

/// A behavior class's schedule together with its counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSchedule {
    pub config: ScheduleConfig,
    pub runtime: ScheduleRuntime,
}

impl BehaviorSchedule {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            runtime: ScheduleRuntime::new(),
        }
    }

    pub fn is_eligible<R: Rng + ?Sized>(&mut self, now: SimTime, rng: &mut R, spread: f64) -> bool {
        self.runtime.is_eligible(&self.config, now, rng, spread)
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, now: SimTime, rng: &mut R, spread: f64) {
        self.runtime.reset(&self.config, now, rng, spread);
    }

    /// Swap in a new schedule, discarding progress toward the old one
    pub fn replace(&mut self, config: ScheduleConfig) {
        self.config = config;
        self.runtime.clear();
    }
}
