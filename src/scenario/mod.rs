//! Training scenarios
//!
//! A scenario names the two behaviors, says whether the trainer is trying
//! to reduce the problem behavior or build the replacement, and carries
//! the default session parameters. The engine only reads scenarios when a
//! session starts.

pub mod catalog;
pub mod loader;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intervention::Intervention;
use crate::schedule::ScheduleConfig;
use crate::session::delivery::ReinforcerConfig;

pub use catalog::Catalog;
pub use loader::{load_scenario, load_scenario_dir, parse_scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Build the alternative behavior
    Increase,
    /// Bring the target behavior down
    Reduce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

/// Session parameters a scenario starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultParams {
    pub intervention: Intervention,
    pub target_schedule: ScheduleConfig,
    pub alt_schedule: ScheduleConfig,
    pub reinforcer: ReinforcerConfig,
    /// Session length in seconds
    pub session_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_behavior: String,
    pub alternative_behavior: String,
    pub goal: Goal,
    pub recommended_intervention: Intervention,
    pub difficulty: Difficulty,
    pub defaults: DefaultParams,
}

impl Scenario {
    /// Copy of this scenario with a different session length
    pub fn with_duration(&self, seconds: f64) -> Self {
        let mut scenario = self.clone();
        scenario.defaults.session_duration = seconds;
        scenario
    }

    /// Copy of this scenario starting under a different intervention
    pub fn with_intervention(&self, intervention: Intervention) -> Self {
        let mut scenario = self.clone();
        scenario.defaults.intervention = intervention;
        scenario
    }
}
