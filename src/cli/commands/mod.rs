//! CLI command implementations

pub mod prove;
pub mod root;
pub mod simulate;
pub mod verify;

// Common utilities for commands
use crate::config::SimulationConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Load the simulation config from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => SimulationConfig::load().context("Failed to load default config"),
    }
}
