//! Operator controls applied between ticks

use crate::core::error::{LabError, Result};
use crate::core::types::{clamp01, BehaviorClass};
use crate::intervention::Intervention;
use crate::scenario::Scenario;
use crate::schedule::ScheduleConfig;
use crate::session::delivery::ReinforcerConfig;
use crate::session::events::EventKind;
use crate::session::state::SessionState;

impl SessionState {
    fn ensure_running(&self) -> Result<()> {
        if self.clock.complete {
            Err(LabError::SessionComplete)
        } else {
            Ok(())
        }
    }

    /// Switch strategy; takes effect on the next tick
    pub fn set_intervention(&mut self, intervention: Intervention) -> Result<()> {
        self.ensure_running()?;
        let previous = self.intervention;
        self.intervention = intervention;
        self.events.record(
            self.clock.time,
            EventKind::InterventionChanged,
            format!("Intervention changed from {} to {}", previous, intervention),
            None,
        );
        tracing::info!(time = self.clock.time, from = %previous, to = %intervention, "intervention changed");
        Ok(())
    }

    /// Replace one class's schedule, discarding progress toward the old one
    pub fn set_schedule(&mut self, class: BehaviorClass, config: ScheduleConfig) -> Result<()> {
        self.ensure_running()?;
        self.schedule_mut(class).replace(config);
        tracing::info!(time = self.clock.time, %class, schedule = %config, "schedule changed");
        Ok(())
    }

    pub fn set_reinforcer(&mut self, reinforcer: ReinforcerConfig) -> Result<()> {
        self.ensure_running()?;
        self.reinforcer = reinforcer;
        tracing::info!(time = self.clock.time, %reinforcer, "reinforcer changed");
        Ok(())
    }

    /// Operator override of MO
    ///
    /// Decay re-derives MO from satiation, so the override only shapes
    /// the emission of the next tick.
    pub fn set_motivation(&mut self, motivation: f64) -> Result<()> {
        self.ensure_running()?;
        self.internal.motivation = clamp01(motivation);
        tracing::info!(motivation = self.internal.motivation, "motivation override");
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.ensure_running()?;
        self.clock.paused = paused;
        Ok(())
    }

    /// Flip the pause flag; returns the new value
    pub fn toggle_pause(&mut self) -> Result<bool> {
        let paused = !self.clock.paused;
        self.set_paused(paused)?;
        Ok(paused)
    }

    /// Fresh state for the same scenario and session number
    pub fn restart(&self, scenario: &Scenario) -> SessionState {
        SessionState::with_config(scenario, self.session_number, self.config.clone())
    }

    /// Fresh state for the next session of the same scenario
    pub fn next_session(&self, scenario: &Scenario) -> SessionState {
        SessionState::with_config(scenario, self.session_number + 1, self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Catalog;
    use crate::schedule::{Requirement, ScheduleKind};
    use crate::session::delivery::{Magnitude, ReinforcerKind};

    fn state() -> (Scenario, SessionState) {
        let scenario = Catalog::builtin().find("sitting").unwrap().clone();
        let state = SessionState::initialize(&scenario, 2);
        (scenario, state)
    }

    #[test]
    fn test_set_intervention_logs_event() {
        let (_, mut state) = state();
        state.set_intervention(Intervention::Ncr).unwrap();
        assert_eq!(state.intervention, Intervention::Ncr);
        let event = state.events.of_kind(EventKind::InterventionChanged).next().unwrap();
        assert!(event.details.contains("NCR"));
    }

    #[test]
    fn test_set_schedule_clears_progress() {
        let (_, mut state) = state();
        state.alt.runtime.responses = 2;
        state.alt.runtime.requirement = Requirement::Resolved(3.0);
        state
            .set_schedule(BehaviorClass::Alternative, ScheduleConfig::fixed_ratio(4))
            .unwrap();
        assert_eq!(state.alt.config.kind, ScheduleKind::FixedRatio);
        assert_eq!(state.alt.runtime.responses, 0);
        assert_eq!(state.alt.runtime.requirement, Requirement::Unresolved);
    }

    #[test]
    fn test_set_motivation_clamps() {
        let (_, mut state) = state();
        state.set_motivation(1.7).unwrap();
        assert_eq!(state.internal.motivation, 1.0);
        state.set_motivation(-0.2).unwrap();
        assert_eq!(state.internal.motivation, 0.0);
    }

    #[test]
    fn test_toggle_pause() {
        let (_, mut state) = state();
        assert!(state.toggle_pause().unwrap());
        assert!(!state.is_active());
        assert!(!state.toggle_pause().unwrap());
        assert!(state.is_active());
    }

    #[test]
    fn test_mutators_rejected_after_completion() {
        let (_, mut state) = state();
        state.clock.complete = true;
        assert!(matches!(state.set_intervention(Intervention::Dro), Err(LabError::SessionComplete)));
        assert!(state
            .set_reinforcer(ReinforcerConfig::new(ReinforcerKind::Praise, Magnitude::One))
            .is_err());
        assert!(state.toggle_pause().is_err());
        assert!(!state.events.contains(EventKind::InterventionChanged));
    }

    #[test]
    fn test_restart_and_next_session() {
        let (scenario, mut state) = state();
        state.counters.reinforcers_delivered = 7;
        state.config.noise_amplitude = 0.0;

        let again = state.restart(&scenario);
        assert_eq!(again.session_number, 2);
        assert_eq!(again.counters.reinforcers_delivered, 0);
        assert_eq!(again.config.noise_amplitude, 0.0);

        let next = state.next_session(&scenario);
        assert_eq!(next.session_number, 3);
    }
}
