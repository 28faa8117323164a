//! The simulated animal: motivational state and behavior emission

pub mod emission;
pub mod motivation;

pub use emission::{emit, Emission, Propensities};
pub use motivation::InternalState;
