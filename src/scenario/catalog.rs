//! Built-in scenario catalog

use crate::core::error::{LabError, Result};
use crate::intervention::Intervention;
use crate::schedule::ScheduleConfig;
use crate::session::delivery::{Magnitude, ReinforcerConfig, ReinforcerKind};

use super::{DefaultParams, Difficulty, Goal, Scenario};

/// Ordered collection of scenarios
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four scenarios shipped with the lab
    pub fn builtin() -> Self {
        Self {
            scenarios: vec![jumping(), meowing(), sitting(), scratching()],
        }
    }

    /// Add a scenario, replacing any existing one with the same id
    pub fn insert(&mut self, scenario: Scenario) {
        match self.scenarios.iter_mut().find(|s| s.id == scenario.id) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    pub fn find(&self, id: &str) -> Result<&Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| LabError::UnknownScenario(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn jumping() -> Scenario {
    Scenario {
        id: "jumping".into(),
        title: "Jumping on Counter".into(),
        description: "Reduce the cat jumping on the kitchen counter by reinforcing sitting on the floor.".into(),
        target_behavior: "Jumping on counter".into(),
        alternative_behavior: "Sitting on floor".into(),
        goal: Goal::Reduce,
        recommended_intervention: Intervention::Dra,
        difficulty: Difficulty::Easy,
        defaults: DefaultParams {
            intervention: Intervention::Dra,
            target_schedule: ScheduleConfig::extinction(),
            alt_schedule: ScheduleConfig::variable_interval(8.0),
            reinforcer: ReinforcerConfig::new(ReinforcerKind::Treat, Magnitude::Two),
            session_duration: 120.0,
        },
    }
}

fn meowing() -> Scenario {
    Scenario {
        id: "meowing".into(),
        title: "Constant Meowing".into(),
        description: "Reduce excessive meowing by reinforcing quiet periods.".into(),
        target_behavior: "Meowing loudly".into(),
        alternative_behavior: "Quiet behavior".into(),
        goal: Goal::Reduce,
        recommended_intervention: Intervention::Dro,
        difficulty: Difficulty::Medium,
        defaults: DefaultParams {
            intervention: Intervention::Dro,
            target_schedule: ScheduleConfig::extinction(),
            alt_schedule: ScheduleConfig::fixed_interval(10.0),
            reinforcer: ReinforcerConfig::new(ReinforcerKind::Praise, Magnitude::One),
            session_duration: 120.0,
        },
    }
}

fn sitting() -> Scenario {
    Scenario {
        id: "sitting".into(),
        title: "Sitting Calmly".into(),
        description: "Increase calm sitting behavior for grooming or vet visits.".into(),
        target_behavior: "Running around".into(),
        alternative_behavior: "Sitting calmly".into(),
        goal: Goal::Increase,
        recommended_intervention: Intervention::Dra,
        difficulty: Difficulty::Easy,
        defaults: DefaultParams {
            intervention: Intervention::Dra,
            target_schedule: ScheduleConfig::extinction(),
            alt_schedule: ScheduleConfig::variable_ratio(3.0),
            reinforcer: ReinforcerConfig::new(ReinforcerKind::Treat, Magnitude::Three),
            session_duration: 90.0,
        },
    }
}

fn scratching() -> Scenario {
    Scenario {
        id: "scratching".into(),
        title: "Scratching Couch".into(),
        description: "Reduce couch scratching by reinforcing scratching post use.".into(),
        target_behavior: "Scratching couch".into(),
        alternative_behavior: "Using scratching post".into(),
        goal: Goal::Reduce,
        recommended_intervention: Intervention::Dri,
        difficulty: Difficulty::Hard,
        defaults: DefaultParams {
            intervention: Intervention::Dri,
            target_schedule: ScheduleConfig::extinction(),
            alt_schedule: ScheduleConfig::fixed_ratio(2),
            reinforcer: ReinforcerConfig::new(ReinforcerKind::Clicker, Magnitude::Two),
            session_duration: 150.0,
        },
    }
}
