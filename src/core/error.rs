use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Scenario not found: {0}")]
    UnknownScenario(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Session is complete; start a new session to continue")]
    SessionComplete,

    #[error("Unknown intervention: {0}")]
    UnknownIntervention(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid reinforcer: {0}")]
    InvalidReinforcer(String),

    #[error("Failed to parse {path}: {source}")]
    ScenarioParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;
