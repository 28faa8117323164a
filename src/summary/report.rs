//! Session report output

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::scenario::Scenario;
use crate::session::state::SessionState;

use super::rating::{recommendations, Rating, Recommendation, BURST_NOTE};
use super::{generate_summary, SessionSummary};

/// Summary, grade and advice for one finished session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub rating: Rating,
    pub message: String,
    pub recommendations: Vec<Recommendation>,
}

impl SessionReport {
    pub fn new(summary: SessionSummary) -> Self {
        let rating = Rating::assess(&summary.kpis, summary.goal);
        let message = rating.message(summary.goal).to_string();
        let recommendations = recommendations(&summary);
        Self {
            summary,
            rating,
            message,
            recommendations,
        }
    }

    pub fn from_session(state: &SessionState, scenario: &Scenario) -> Self {
        Self::new(generate_summary(state, scenario))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Multi-line human-readable report
    pub fn summary(&self) -> String {
        let s = &self.summary;
        let k = &s.kpis;
        let mut out = String::new();

        let _ = writeln!(out, "{} - session {}", s.scenario, s.session_number);
        let _ = writeln!(out, "Rating: {} ({})", self.rating, self.message);
        let _ = writeln!(
            out,
            "Strategy: {} | target {} | alt {} | {}",
            s.intervention, s.target_schedule, s.alt_schedule, s.reinforcer
        );
        let _ = writeln!(out, "Duration: {:.1}s", s.duration);
        let _ = writeln!(
            out,
            "Target rate: {:.1} -> {:.1}/min ({:+.1}%), {} occurrences",
            s.target_rates.baseline, s.target_rates.final_rate, k.target_rate_change_pct, k.target_occurrences
        );
        let _ = writeln!(
            out,
            "Alt rate:    {:.1} -> {:.1}/min ({:+.1}%), {} occurrences",
            s.alt_rates.baseline, s.alt_rates.final_rate, k.alt_rate_change_pct, k.alt_occurrences
        );
        let _ = writeln!(
            out,
            "Reinforcers: {} | IRT target {:.1}s, alt {:.1}s",
            k.reinforcers_delivered, k.avg_irt_target, k.avg_irt_alt
        );
        let _ = writeln!(
            out,
            "Extinction burst: {} | final MO {:.0}%, SAT {:.0}%",
            if k.burst_detected { "yes" } else { "no" },
            k.final_motivation * 100.0,
            k.final_satiation * 100.0
        );

        if k.burst_detected {
            let _ = writeln!(out, "Note: {}", BURST_NOTE);
        }
        for rec in &self.recommendations {
            let _ = writeln!(out, "- {}", rec);
        }
        out
    }
}
