//! Post-session summary
//!
//! Compares the opening and closing stretches of the rate history, averages
//! inter-response times from the event log, and snapshots the final
//! motivational state. Read-only over a finished session.

pub mod batch;
pub mod rating;
pub mod report;

use serde::{Deserialize, Serialize};

use crate::core::types::BehaviorClass;
use crate::intervention::Intervention;
use crate::scenario::{Goal, Scenario};
use crate::schedule::ScheduleConfig;
use crate::session::delivery::ReinforcerConfig;
use crate::session::events::{Event, EventKind, EventLog};
use crate::session::state::SessionState;

pub use batch::{run_replicates, BatchStats};
pub use rating::{recommendations, Rating, Recommendation};
pub use report::SessionReport;

/// Opening vs closing rate of one behavior class
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateChange {
    /// Mean responses/min over the opening window
    pub baseline: f64,
    /// Mean responses/min over the closing window
    pub final_rate: f64,
    pub change_pct: f64,
}

impl RateChange {
    /// Compare the first and last `window` samples
    ///
    /// A zero baseline yields `zero_baseline_pct` when the final rate is
    /// positive and 0 otherwise.
    pub fn from_samples(samples: &[f64], window: usize, zero_baseline_pct: f64) -> Self {
        let baseline = prefix_mean(samples, window);
        let final_rate = suffix_mean(samples, window);
        let change_pct = if baseline > 0.0 {
            (final_rate - baseline) / baseline * 100.0
        } else if final_rate > 0.0 {
            zero_baseline_pct
        } else {
            0.0
        };
        Self {
            baseline,
            final_rate,
            change_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub target_rate_change_pct: f64,
    pub alt_rate_change_pct: f64,
    pub reinforcers_delivered: u32,
    pub target_occurrences: u32,
    pub alt_occurrences: u32,
    /// Mean seconds between target occurrences (0 with fewer than two)
    pub avg_irt_target: f64,
    pub avg_irt_alt: f64,
    pub burst_detected: bool,
    pub final_motivation: f64,
    pub final_satiation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub scenario: String,
    pub scenario_id: String,
    pub goal: Goal,
    pub session_number: u32,
    pub intervention: Intervention,
    pub target_schedule: ScheduleConfig,
    pub alt_schedule: ScheduleConfig,
    pub reinforcer: ReinforcerConfig,
    /// Simulated seconds actually run
    pub duration: f64,
    pub target_rates: RateChange,
    pub alt_rates: RateChange,
    pub kpis: Kpis,
    pub events: Vec<Event>,
}

/// Summarize a session
///
/// Meant for a completed session, though nothing stops calling it early.
pub fn generate_summary(state: &SessionState, scenario: &Scenario) -> SessionSummary {
    let series = &state.rates.series;
    let window = summary_window(series.len(), state.config.summary_window_fraction);

    let target_rates = RateChange::from_samples(&series.target, window, 0.0);
    let alt_rates = RateChange::from_samples(&series.alt, window, 100.0);

    let kpis = Kpis {
        target_rate_change_pct: target_rates.change_pct,
        alt_rate_change_pct: alt_rates.change_pct,
        reinforcers_delivered: state.counters.reinforcers_delivered,
        target_occurrences: state.counters.target_occurrences,
        alt_occurrences: state.counters.alt_occurrences,
        avg_irt_target: mean_irt(&state.events, BehaviorClass::Target),
        avg_irt_alt: mean_irt(&state.events, BehaviorClass::Alternative),
        burst_detected: state.events.contains(EventKind::BurstDetected),
        final_motivation: state.internal.motivation,
        final_satiation: state.internal.satiation,
    };

    SessionSummary {
        scenario: scenario.title.clone(),
        scenario_id: scenario.id.clone(),
        goal: scenario.goal,
        session_number: state.session_number,
        intervention: state.intervention,
        target_schedule: state.target.config,
        alt_schedule: state.alt.config,
        reinforcer: state.reinforcer,
        duration: state.clock.time,
        target_rates,
        alt_rates,
        kpis,
        events: state.events.as_slice().to_vec(),
    }
}

/// Samples in each comparison window: floor(fraction * count)
pub fn summary_window(samples: usize, fraction: f64) -> usize {
    (samples as f64 * fraction).floor() as usize
}

fn prefix_mean(samples: &[f64], window: usize) -> f64 {
    if window == 0 || window > samples.len() {
        return 0.0;
    }
    samples[..window].iter().sum::<f64>() / window as f64
}

fn suffix_mean(samples: &[f64], window: usize) -> f64 {
    if window == 0 || window > samples.len() {
        return 0.0;
    }
    samples[samples.len() - window..].iter().sum::<f64>() / window as f64
}

/// Mean gap between consecutive occurrences of a class
pub fn mean_irt(events: &EventLog, class: BehaviorClass) -> f64 {
    let mut occurrences = events.occurrences(class).map(|e| e.time);
    let Some(first) = occurrences.next() else {
        return 0.0;
    };
    let (count, last) = occurrences.fold((0usize, first), |(n, _), t| (n + 1, t));
    if count == 0 {
        0.0
    } else {
        (last - first) / count as f64
    }
}
