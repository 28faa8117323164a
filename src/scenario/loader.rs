//! Load scenarios from TOML files

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{LabError, Result};

use super::Scenario;

/// Default directory for user-supplied scenarios
pub fn default_scenario_dir() -> PathBuf {
    PathBuf::from("data/scenarios")
}

/// Parse one scenario; `origin` only labels errors
pub fn parse_scenario(contents: &str, origin: &str) -> Result<Scenario> {
    let scenario: Scenario = toml::from_str(contents).map_err(|source| LabError::ScenarioParse {
        path: origin.to_string(),
        source,
    })?;

    if !(scenario.defaults.session_duration > 0.0) {
        return Err(LabError::InvalidConfig(format!(
            "{}: session_duration must be positive, got {}",
            origin, scenario.defaults.session_duration
        )));
    }

    Ok(scenario)
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)?;
    parse_scenario(&contents, &path.display().to_string())
}

/// Load every `*.toml` scenario in a directory, ordered by file name
pub fn load_scenario_dir(dir: &Path) -> Result<Vec<Scenario>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut scenarios = Vec::with_capacity(paths.len());
    for path in paths {
        let scenario = load_scenario(&path)?;
        tracing::debug!(id = %scenario.id, path = %path.display(), "loaded scenario");
        scenarios.push(scenario);
    }
    Ok(scenarios)
}
