//! Performance rating and training recommendations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intervention::Intervention;
use crate::scenario::Goal;

use super::{Kpis, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Rating {
    /// Grade a session against its goal
    pub fn assess(kpis: &Kpis, goal: Goal) -> Self {
        let target = kpis.target_rate_change_pct;
        let alt = kpis.alt_rate_change_pct;
        match goal {
            Goal::Reduce => {
                if target < -30.0 && alt > 30.0 {
                    Rating::Excellent
                } else if target < -15.0 {
                    Rating::Good
                } else if target < 0.0 {
                    Rating::Fair
                } else {
                    Rating::NeedsImprovement
                }
            }
            Goal::Increase => {
                if alt > 50.0 {
                    Rating::Excellent
                } else if alt > 25.0 {
                    Rating::Good
                } else if alt > 0.0 {
                    Rating::Fair
                } else {
                    Rating::NeedsImprovement
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn message(&self, goal: Goal) -> &'static str {
        match (goal, self) {
            (Goal::Reduce, Rating::Excellent) => {
                "Great job! Target behavior reduced significantly and alternative behavior increased!"
            }
            (Goal::Reduce, Rating::Good) => "Good progress. Target behavior is decreasing.",
            (Goal::Reduce, Rating::Fair) => "Some progress. Consider adjusting your strategy.",
            (Goal::Reduce, Rating::NeedsImprovement) => {
                "Target behavior increased. Review your intervention strategy."
            }
            (Goal::Increase, Rating::Excellent) => {
                "Excellent work! Alternative behavior increased significantly!"
            }
            (Goal::Increase, Rating::Good) => "Good progress on increasing the alternative behavior.",
            (Goal::Increase, Rating::Fair) => {
                "Slight improvement. Consider strengthening reinforcement."
            }
            (Goal::Increase, Rating::NeedsImprovement) => {
                "Behavior did not increase. Review your approach."
            }
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseFrequency,
    ShortenSessions,
    EstablishingOperations,
    ReviewMaintainingReinforcement,
    RicherReinforcement,
    ConsistentExtinction,
}

impl Recommendation {
    pub fn text(&self) -> &'static str {
        match self {
            Recommendation::IncreaseFrequency => {
                "Consider increasing reinforcement frequency to strengthen alternative behavior."
            }
            Recommendation::ShortenSessions => {
                "High satiation at end - consider shorter sessions or varied reinforcers."
            }
            Recommendation::EstablishingOperations => {
                "Low motivation at end - ensure establishing operations are in place."
            }
            Recommendation::ReviewMaintainingReinforcement => {
                "Target behavior increased - review if reinforcement is maintaining the problem behavior."
            }
            Recommendation::RicherReinforcement => {
                "Alternative behavior didn't increase much - consider richer reinforcement or teaching the skill."
            }
            Recommendation::ConsistentExtinction => "Good consistency! No extinction burst observed.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Shown alongside the recommendations when a burst was logged
pub const BURST_NOTE: &str = "An extinction burst occurred during this session. This is a normal \
response when reinforcement is withheld: the behavior temporarily increased before decreasing.";

/// Every recommendation whose condition holds, in display order
pub fn recommendations(summary: &SessionSummary) -> Vec<Recommendation> {
    let kpis = &summary.kpis;
    let mut out = Vec::new();

    if kpis.reinforcers_delivered < 5 {
        out.push(Recommendation::IncreaseFrequency);
    }
    if kpis.final_satiation > 0.7 {
        out.push(Recommendation::ShortenSessions);
    }
    if kpis.final_motivation < 0.3 {
        out.push(Recommendation::EstablishingOperations);
    }
    if kpis.target_rate_change_pct > 0.0 && summary.goal == Goal::Reduce {
        out.push(Recommendation::ReviewMaintainingReinforcement);
    }
    if kpis.alt_rate_change_pct < 10.0 {
        out.push(Recommendation::RicherReinforcement);
    }
    if summary.intervention == Intervention::Extinction && !kpis.burst_detected {
        out.push(Recommendation::ConsistentExtinction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleConfig;
    use crate::session::delivery::{Magnitude, ReinforcerConfig, ReinforcerKind};
    use crate::summary::RateChange;

    fn kpis(target: f64, alt: f64) -> Kpis {
        Kpis {
            target_rate_change_pct: target,
            alt_rate_change_pct: alt,
            reinforcers_delivered: 12,
            target_occurrences: 40,
            alt_occurrences: 30,
            avg_irt_target: 3.0,
            avg_irt_alt: 4.0,
            burst_detected: false,
            final_motivation: 0.6,
            final_satiation: 0.4,
        }
    }

    #[test]
    fn test_reduce_thresholds() {
        assert_eq!(Rating::assess(&kpis(-40.0, 40.0), Goal::Reduce), Rating::Excellent);
        // Strong reduction without alt growth only earns Good
        assert_eq!(Rating::assess(&kpis(-40.0, 10.0), Goal::Reduce), Rating::Good);
        assert_eq!(Rating::assess(&kpis(-10.0, 80.0), Goal::Reduce), Rating::Fair);
        assert_eq!(Rating::assess(&kpis(0.0, 80.0), Goal::Reduce), Rating::NeedsImprovement);
    }

    #[test]
    fn test_increase_thresholds() {
        assert_eq!(Rating::assess(&kpis(50.0, 60.0), Goal::Increase), Rating::Excellent);
        assert_eq!(Rating::assess(&kpis(0.0, 30.0), Goal::Increase), Rating::Good);
        assert_eq!(Rating::assess(&kpis(0.0, 5.0), Goal::Increase), Rating::Fair);
        assert_eq!(Rating::assess(&kpis(-50.0, 0.0), Goal::Increase), Rating::NeedsImprovement);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Rating::NeedsImprovement.to_string(), "Needs Improvement");
        assert!(Rating::Good.message(Goal::Reduce).contains("decreasing"));
    }

    fn summary(kpis: Kpis, goal: Goal, intervention: Intervention) -> SessionSummary {
        SessionSummary {
            scenario: "Test".into(),
            scenario_id: "test".into(),
            goal,
            session_number: 1,
            intervention,
            target_schedule: ScheduleConfig::extinction(),
            alt_schedule: ScheduleConfig::continuous(),
            reinforcer: ReinforcerConfig::new(ReinforcerKind::Treat, Magnitude::Two),
            duration: 60.0,
            target_rates: RateChange::default(),
            alt_rates: RateChange::default(),
            kpis,
            events: Vec::new(),
        }
    }

    #[test]
    fn test_recommendation_rules() {
        use Recommendation::*;

        let healthy = kpis(-20.0, 40.0);
        let cases: Vec<(&str, Kpis, Goal, Intervention, Vec<Recommendation>)> = vec![
            ("healthy", healthy.clone(), Goal::Reduce, Intervention::Dra, vec![]),
            ("four reinforcers", Kpis { reinforcers_delivered: 4, ..healthy.clone() }, Goal::Reduce, Intervention::Dra, vec![IncreaseFrequency]),
            ("five reinforcers", Kpis { reinforcers_delivered: 5, ..healthy.clone() }, Goal::Reduce, Intervention::Dra, vec![]),
            ("satiated", Kpis { final_satiation: 0.75, ..healthy.clone() }, Goal::Reduce, Intervention::Dra, vec![ShortenSessions]),
            ("satiation at limit", Kpis { final_satiation: 0.7, ..healthy.clone() }, Goal::Reduce, Intervention::Dra, vec![]),
            ("unmotivated", Kpis { final_motivation: 0.25, ..healthy.clone() }, Goal::Reduce, Intervention::Dra, vec![EstablishingOperations]),
            ("motivation at limit", Kpis { final_motivation: 0.3, ..healthy.clone() }, Goal::Reduce, Intervention::Dra, vec![]),
            ("target up, reduce goal", kpis(12.0, 40.0), Goal::Reduce, Intervention::Dra, vec![ReviewMaintainingReinforcement]),
            ("target flat, reduce goal", kpis(0.0, 40.0), Goal::Reduce, Intervention::Dra, vec![]),
            ("target up, increase goal", kpis(12.0, 40.0), Goal::Increase, Intervention::Dra, vec![]),
            ("alt barely up", kpis(-20.0, 9.0), Goal::Reduce, Intervention::Dra, vec![RicherReinforcement]),
            ("alt up ten percent", kpis(-20.0, 10.0), Goal::Reduce, Intervention::Dra, vec![]),
            ("extinction without burst", healthy.clone(), Goal::Reduce, Intervention::Extinction, vec![ConsistentExtinction]),
            ("extinction with burst", Kpis { burst_detected: true, ..healthy.clone() }, Goal::Reduce, Intervention::Extinction, vec![]),
            (
                "everything at once",
                Kpis {
                    reinforcers_delivered: 0,
                    final_satiation: 0.9,
                    final_motivation: 0.2,
                    ..kpis(25.0, -5.0)
                },
                Goal::Reduce,
                Intervention::Extinction,
                vec![
                    IncreaseFrequency,
                    ShortenSessions,
                    EstablishingOperations,
                    ReviewMaintainingReinforcement,
                    RicherReinforcement,
                    ConsistentExtinction,
                ],
            ),
        ];

        for (name, kpis, goal, intervention, expected) in cases {
            assert_eq!(recommendations(&summary(kpis, goal, intervention)), expected, "{}", name);
        }
    }
}
