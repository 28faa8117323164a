//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::LabError;

/// Simulated session time in seconds
pub type SimTime = f64;

/// Tolerance for comparing accumulated float time against thresholds
///
/// Ten additions of 0.1 land just under 1.0, so every "has this much time
/// passed" check goes through `has_elapsed` instead of a bare `>=`.
pub const TIME_EPSILON: f64 = 1e-9;

/// The two behavior classes tracked in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorClass {
    /// The problem behavior the trainer wants to change
    Target,
    /// The replacement behavior the trainer wants to build
    Alternative,
}

impl BehaviorClass {
    pub fn all() -> [BehaviorClass; 2] {
        [BehaviorClass::Target, BehaviorClass::Alternative]
    }

    pub fn label(&self) -> &'static str {
        match self {
            BehaviorClass::Target => "target",
            BehaviorClass::Alternative => "alt",
        }
    }
}

impl fmt::Display for BehaviorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BehaviorClass {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "target" | "t" => Ok(BehaviorClass::Target),
            "alt" | "alternative" | "a" => Ok(BehaviorClass::Alternative),
            other => Err(LabError::InvalidConfig(format!(
                "unknown behavior class '{}' (expected target or alt)",
                other
            ))),
        }
    }
}

/// Clamp to the unit interval
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// True once `elapsed` has reached `threshold`, tolerating float drift
pub fn has_elapsed(elapsed: SimTime, threshold: SimTime) -> bool {
    elapsed + TIME_EPSILON >= threshold
}

/// Box-Muller draw from N(mean, std)
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z0 * std
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_clamp01_bounds() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(0.42), 0.42);
    }

    #[test]
    fn test_sigmoid_midpoint_and_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_has_elapsed_tolerates_accumulated_steps() {
        let mut t = 0.0;
        for _ in 0..50 {
            t += 0.1;
        }
        // Accumulated value sits a hair below 5.0
        assert!(t < 5.0);
        assert!(has_elapsed(t, 5.0));
        assert!(!has_elapsed(4.9, 5.0));
    }

    #[test]
    fn test_sample_normal_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| sample_normal(&mut rng, 10.0, 3.0)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.1, "mean was {}", mean);
    }

    #[test]
    fn test_behavior_class_parse() {
        assert_eq!("alt".parse::<BehaviorClass>().unwrap(), BehaviorClass::Alternative);
        assert_eq!("Target".parse::<BehaviorClass>().unwrap(), BehaviorClass::Target);
        assert!("other".parse::<BehaviorClass>().is_err());
    }
}
