//! One fixed-timestep state transition
//!
//! Order within a tick: decay, emission, schedule bookkeeping, timers,
//! eligibility, intervention decision, consequences, clamping, animation
//! cue, rate window, time advance, completion.

use rand::Rng;

use crate::behavior::emission::{emit, Emission};
use crate::core::types::BehaviorClass;
use crate::intervention::{decide, Decision, PolicyInput};
use crate::session::delivery::{deliver, punish};
use crate::session::events::EventKind;
use crate::session::state::SessionState;

/// Advance the session by one timestep
///
/// No-op while paused or once the session is complete.
pub fn tick<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R) {
    if !state.is_active() {
        return;
    }
    state.internal.decay(&state.config);
    let emission = emit(&state.internal, &state.config, rng);
    resolve(state, emission, rng);
}

/// Advance one timestep with a pre-chosen emission
///
/// Everything after sampling runs exactly as in `tick`; the random source
/// is still used for variable schedule requirements.
pub fn tick_with_emission<R: Rng + ?Sized>(state: &mut SessionState, emission: Emission, rng: &mut R) {
    if !state.is_active() {
        return;
    }
    state.internal.decay(&state.config);
    resolve(state, emission, rng);
}

/// Run `tick` until the session completes; returns the ticks executed
///
/// Returns immediately when the session is paused.
pub fn run_to_completion<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R) -> u64 {
    let mut ticks = 0;
    while state.is_active() {
        tick(state, rng);
        ticks += 1;
    }
    ticks
}

fn resolve<R: Rng + ?Sized>(state: &mut SessionState, emission: Emission, rng: &mut R) {
    let now = state.clock.time;
    let dt = state.clock.timestep;
    let spread = state.config.variable_spread;

    if let Some(class) = emission.class() {
        state.counters.record(class);
        state.schedule_mut(class).runtime.mark_response();
        let details = match class {
            BehaviorClass::Target => "Target behavior occurred",
            BehaviorClass::Alternative => "Alternative behavior occurred",
        };
        state
            .events
            .record(now, EventKind::BehaviorOccurred, details, Some(class));
    }

    state.timers.advance(emission, dt);

    let input = PolicyInput {
        emission,
        target_eligible: state.target.is_eligible(now, rng, spread),
        alt_eligible: state.alt.is_eligible(now, rng, spread),
        burst_ready: state.internal.burst_ready(&state.config),
    };
    let decision = decide(state.intervention, &input, &mut state.timers);

    match decision {
        Decision::Withhold => {}
        Decision::Deliver(delivery) => deliver(state, delivery, rng),
        Decision::Punish => punish(state),
        Decision::Burst => {
            state.internal.start_burst();
            state
                .events
                .record(now, EventKind::BurstDetected, "Extinction burst detected", None);
            tracing::debug!(time = now, "extinction burst");
        }
    }
    state.internal.clamp();

    let reinforced = matches!(decision, Decision::Deliver(_));
    state
        .cue
        .update(now, emission, reinforced, &state.internal, &state.config);

    state.rates.record(emission);
    state
        .rates
        .sample_if_second(now, state.clock.previous_time(), dt);

    state.clock.advance();
    if state.clock.step >= state.clock.total_steps() {
        finish(state);
    }
}

fn finish(state: &mut SessionState) {
    let now = state.clock.time;
    state.clock.complete = true;
    state.rates.sample(now, state.clock.timestep);
    state
        .events
        .record(now, EventKind::SessionEnded, "Session completed", None);

    tracing::info!(
        scenario = %state.scenario_id,
        session = state.session_number,
        time = now,
        target = state.counters.target_occurrences,
        alt = state.counters.alt_occurrences,
        reinforcers = state.counters.reinforcers_delivered,
        "session complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::Intervention;
    use crate::scenario::Catalog;
    use crate::schedule::ScheduleConfig;
    use crate::session::animation::CueKind;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_for(id: &str, seconds: f64, intervention: Intervention) -> SessionState {
        let catalog = Catalog::builtin();
        let scenario = catalog
            .find(id)
            .unwrap()
            .with_duration(seconds)
            .with_intervention(intervention);
        SessionState::initialize(&scenario, 1)
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut state = state_for("jumping", 10.0, Intervention::Dra);
        state.clock.paused = true;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tick(&mut state, &mut rng);
        assert_eq!(state.clock.step, 0);
        assert_eq!(state.internal.satiation, 0.2);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_occurrence_is_counted_and_logged() {
        let mut state = state_for("jumping", 10.0, Intervention::Extinction);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tick_with_emission(&mut state, Emission::ALT, &mut rng);

        assert_eq!(state.counters.alt_occurrences, 1);
        assert_eq!(state.alt.runtime.responses, 1);
        assert_eq!(state.events.occurrences(BehaviorClass::Alternative).count(), 1);
        assert_eq!(state.cue.kind, CueKind::AltBehavior);
    }

    #[test]
    fn test_crf_delivers_every_alternative() {
        let mut state = state_for("jumping", 10.0, Intervention::Dra);
        state.alt.replace(ScheduleConfig::continuous());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..5 {
            tick_with_emission(&mut state, Emission::ALT, &mut rng);
        }
        assert_eq!(state.counters.reinforcers_delivered, 5);
        assert_eq!(state.alt.runtime.responses, 0);
        assert_eq!(state.cue.kind, CueKind::Reinforcement);
    }

    #[test]
    fn test_first_tick_takes_a_rate_sample() {
        let mut state = state_for("jumping", 10.0, Intervention::Dra);
        tick(&mut state, &mut StepRng::new(u64::MAX, 0));
        assert_eq!(state.rates.series.times, vec![0.0]);
    }

    #[test]
    fn test_completion_freezes_state() {
        let mut state = state_for("jumping", 2.0, Intervention::Extinction);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let ticks = run_to_completion(&mut state, &mut rng);
        assert_eq!(ticks, 20);
        assert!(state.is_complete());
        assert_eq!(state.events.as_slice().last().unwrap().kind, EventKind::SessionEnded);

        let snapshot = state.events.len();
        tick(&mut state, &mut rng);
        assert_eq!(state.clock.step, 20);
        assert_eq!(state.events.len(), snapshot);
    }

    #[test]
    fn test_punishment_suppresses_target_on_crf() {
        let mut state = state_for("jumping", 10.0, Intervention::Punishment);
        state.target.replace(ScheduleConfig::continuous());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tick_with_emission(&mut state, Emission::TARGET, &mut rng);
        assert!((state.internal.recent_target + 0.3).abs() < 1e-12);
        assert!(state.events.contains(EventKind::Punishment));
        assert_eq!(state.counters.reinforcers_delivered, 0);
    }
}
