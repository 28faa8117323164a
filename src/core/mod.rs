pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{LabError, Result};
pub use types::{BehaviorClass, SimTime};
