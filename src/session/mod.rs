//! A single training session
//!
//! `SessionState` is the one mutable aggregate. `tick` advances it by a
//! fixed timestep; the control methods and `deliver_manual` are the only
//! other writers.

pub mod animation;
pub mod control;
pub mod delivery;
pub mod events;
pub mod pacing;
pub mod rates;
pub mod state;
pub mod tick;

pub use animation::{AnimationCue, CueKind};
pub use delivery::{deliver_manual, Magnitude, ReinforcerConfig, ReinforcerKind};
pub use events::{Event, EventKind, EventLog};
pub use pacing::Pacer;
pub use rates::{RateSeries, RateTracker};
pub use state::{Clock, Counters, SessionState};
pub use tick::{run_to_completion, tick, tick_with_emission};
