//! Independent replicate sessions run in parallel
//!
//! Each replicate owns its state and its own seeded random source, so the
//! sessions never share anything mutable.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::scenario::Scenario;
use crate::session::state::SessionState;
use crate::session::tick::run_to_completion;

use super::rating::Rating;
use super::{generate_summary, SessionSummary};

/// Run `replicates` complete sessions, replicate `i` seeded with `seed + i`
///
/// Results come back in replicate order.
pub fn run_replicates(
    scenario: &Scenario,
    session_number: u32,
    config: &EngineConfig,
    seed: u64,
    replicates: usize,
) -> Vec<SessionSummary> {
    (0..replicates)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
            let mut state = SessionState::with_config(scenario, session_number, config.clone());
            run_to_completion(&mut state, &mut rng);
            generate_summary(&state, scenario)
        })
        .collect()
}

/// Aggregate statistics over replicate summaries
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub replicates: usize,
    pub mean_target_change_pct: f64,
    pub mean_alt_change_pct: f64,
    pub mean_reinforcers: f64,
    /// Fraction of replicates that logged an extinction burst
    pub burst_fraction: f64,
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub needs_improvement: usize,
}

impl BatchStats {
    pub fn from_summaries(summaries: &[SessionSummary]) -> Self {
        let n = summaries.len();
        if n == 0 {
            return Self::default();
        }
        let mut stats = Self {
            replicates: n,
            mean_target_change_pct: mean_of(summaries, |s| s.kpis.target_rate_change_pct),
            mean_alt_change_pct: mean_of(summaries, |s| s.kpis.alt_rate_change_pct),
            mean_reinforcers: mean_of(summaries, |s| s.kpis.reinforcers_delivered as f64),
            burst_fraction: mean_of(summaries, |s| if s.kpis.burst_detected { 1.0 } else { 0.0 }),
            ..Self::default()
        };

        for summary in summaries {
            match Rating::assess(&summary.kpis, summary.goal) {
                Rating::Excellent => stats.excellent += 1,
                Rating::Good => stats.good += 1,
                Rating::Fair => stats.fair += 1,
                Rating::NeedsImprovement => stats.needs_improvement += 1,
            }
        }
        stats
    }

    pub fn summary(&self) -> String {
        format!(
            "{} replicates: target {:+.1}%, alt {:+.1}%, {:.1} reinforcers, bursts in {:.0}%\n\
             ratings: {} excellent, {} good, {} fair, {} needs improvement",
            self.replicates,
            self.mean_target_change_pct,
            self.mean_alt_change_pct,
            self.mean_reinforcers,
            self.burst_fraction * 100.0,
            self.excellent,
            self.good,
            self.fair,
            self.needs_improvement,
        )
    }
}

fn mean_of(summaries: &[SessionSummary], f: impl Fn(&SessionSummary) -> f64) -> f64 {
    summaries.iter().map(f).sum::<f64>() / summaries.len() as f64
}
