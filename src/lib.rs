//! Operant Lab - Behavioral Simulation of Animal Training Sessions
//!
//! A fixed-timestep model of one trainer working with one animal:
//! reinforcement schedules, differential-reinforcement strategies,
//! motivation and satiation dynamics, and post-session statistics.

pub mod behavior;
pub mod core;
pub mod intervention;
pub mod scenario;
pub mod schedule;
pub mod session;
pub mod summary;

pub use crate::core::{BehaviorClass, EngineConfig, LabError, Result};
pub use scenario::{Catalog, Scenario};
pub use session::{deliver_manual, tick, SessionState};
pub use summary::{generate_summary, SessionReport, SessionSummary};
