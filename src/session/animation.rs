//! Animation cue handed to the presentation layer
//!
//! Display hint only: nothing here feeds back into the numeric model.

use serde::{Deserialize, Serialize};

use crate::behavior::emission::Emission;
use crate::behavior::motivation::InternalState;
use crate::core::config::EngineConfig;
use crate::core::types::{BehaviorClass, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    Idle,
    TargetBehavior,
    AltBehavior,
    Reinforcement,
    Burst,
    Sleepy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationCue {
    pub kind: CueKind,
    pub started: SimTime,
    pub duration: f64,
}

impl Default for AnimationCue {
    fn default() -> Self {
        Self {
            kind: CueKind::Idle,
            started: 0.0,
            duration: 1.0,
        }
    }
}

impl AnimationCue {
    pub fn new(kind: CueKind, started: SimTime, duration: f64) -> Self {
        Self { kind, started, duration }
    }

    pub fn is_expired(&self, now: SimTime) -> bool {
        now - self.started > self.duration
    }

    /// Pick the cue for this tick
    ///
    /// Priority: delivered reinforcement, then the behavior that occurred,
    /// then (only once the current cue has run out) burst, sleepy or idle.
    pub fn update(
        &mut self,
        now: SimTime,
        emission: Emission,
        reinforced: bool,
        internal: &InternalState,
        config: &EngineConfig,
    ) {
        if reinforced {
            *self = Self::new(CueKind::Reinforcement, now, config.reinforcement_cue_duration);
            return;
        }

        if let Some(class) = emission.class() {
            let kind = match class {
                BehaviorClass::Target => CueKind::TargetBehavior,
                BehaviorClass::Alternative => CueKind::AltBehavior,
            };
            *self = Self::new(kind, now, config.behavior_cue_duration);
            return;
        }

        if self.is_expired(now) {
            let kind = if internal.is_bursting(config) {
                CueKind::Burst
            } else if internal.is_satiated(config) {
                CueKind::Sleepy
            } else {
                CueKind::Idle
            };
            *self = Self::new(kind, now, config.ambient_cue_duration);
        }
    }
}
