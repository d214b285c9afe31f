//! Configuration management for Blockroot
//!
//! Simulation settings live in ~/.blockroot/simulation.toml and can be
//! overridden per run from the command line.

pub mod simulation_config;

// Re-export commonly used items
pub use simulation_config::{ChainConfig, ProofRangeConfig, SimulationConfig};
