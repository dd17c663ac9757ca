//! Loading of simulation parameters from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use predation_core::SimulationConfig;

/// Reads the configuration at `path`, or the defaults when no file is given.
pub(crate) fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    let config = parse(&text)
        .with_context(|| format!("failed to parse configuration file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn parse(text: &str) -> Result<SimulationConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Applies command-line flags on top of the file values.
pub(crate) fn apply_overrides(config: &mut SimulationConfig, seed: Option<u64>) {
    if let Some(seed) = seed {
        config.seed = seed;
    }
}
