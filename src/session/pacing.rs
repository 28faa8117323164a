//! Wall-clock pacing
//!
//! Turns elapsed real time into a number of ticks. The pacer only decides
//! how many ticks run; what a tick does is entirely `tick`'s business.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::core::types::TIME_EPSILON;
use crate::session::state::SessionState;
use crate::session::tick::tick;

pub const SPEED_RANGE: RangeInclusive<f64> = 0.25..=3.0;
pub const MAX_TICKS_PER_FRAME: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Pacer {
    speed: f64,
    /// Simulated seconds owed but not yet ticked
    pending: f64,
    max_ticks_per_frame: u32,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Pacer {
    pub fn new(speed: f64) -> Self {
        Self {
            speed: clamp_speed(speed),
            pending: 0.0,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = clamp_speed(speed);
    }

    /// Run the ticks owed for `elapsed` wall-clock seconds
    ///
    /// At most `MAX_TICKS_PER_FRAME` ticks run per call; a backlog beyond
    /// that is dropped rather than carried into later frames. Returns the
    /// number of ticks executed.
    pub fn advance<R: Rng + ?Sized>(&mut self, state: &mut SessionState, elapsed: f64, rng: &mut R) -> u32 {
        if !state.is_active() {
            self.pending = 0.0;
            return 0;
        }

        let dt = state.clock.timestep;
        self.pending += elapsed.max(0.0) * self.speed;

        let mut ticks = 0;
        while self.pending + TIME_EPSILON >= dt && ticks < self.max_ticks_per_frame {
            tick(state, rng);
            self.pending -= dt;
            ticks += 1;
            if !state.is_active() {
                self.pending = 0.0;
                break;
            }
        }

        if ticks == self.max_ticks_per_frame {
            self.pending = self.pending.min(dt);
        }
        self.pending = self.pending.max(0.0);
        ticks
    }
}

fn clamp_speed(speed: f64) -> f64 {
    speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Catalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state() -> SessionState {
        let scenario = Catalog::builtin().find("jumping").unwrap().with_duration(5.0);
        SessionState::initialize(&scenario, 1)
    }

    #[test]
    fn test_ticks_follow_elapsed_time() {
        let mut state = state();
        let mut pacer = Pacer::new(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pacer.advance(&mut state, 0.3, &mut rng), 3);
        assert_eq!(pacer.advance(&mut state, 0.05, &mut rng), 0);
        assert_eq!(pacer.advance(&mut state, 0.05, &mut rng), 1);
        assert_eq!(state.clock.step, 4);
    }

    #[test]
    fn test_speed_multiplies_and_clamps() {
        let mut state = state();
        let mut pacer = Pacer::new(2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pacer.advance(&mut state, 0.2, &mut rng), 4);

        pacer.set_speed(10.0);
        assert_eq!(pacer.speed(), 3.0);
        pacer.set_speed(0.0);
        assert_eq!(pacer.speed(), 0.25);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut state = state();
        let mut pacer = Pacer::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pacer.advance(&mut state, 3.0, &mut rng), MAX_TICKS_PER_FRAME);
        // The stalled backlog is not replayed
        assert!(pacer.advance(&mut state, 0.0, &mut rng) <= 1);
    }

    #[test]
    fn test_paused_session_runs_nothing() {
        let mut state = state();
        state.clock.paused = true;
        let mut pacer = Pacer::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pacer.advance(&mut state, 1.0, &mut rng), 0);
        assert_eq!(state.clock.step, 0);
    }

    #[test]
    fn test_stops_at_completion() {
        let mut state = state();
        let mut pacer = Pacer::new(3.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut total = 0;
        for _ in 0..100 {
            total += pacer.advance(&mut state, 1.0, &mut rng);
        }
        assert_eq!(total, 50);
        assert!(state.is_complete());
    }
}
