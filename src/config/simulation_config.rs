//! Simulation configuration
//!
//! Stored as TOML in ~/.blockroot/simulation.toml; a missing file means the
//! defaults below.

use crate::core::error::{MerkleError, Result};
use crate::proofs::depth::MAX_NODE_COUNT;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a simulated chain and the proofs checked against it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Shape of the simulated chain
    pub chain: ChainConfig,
    /// Which proofs to build over the chain
    pub proofs: ProofRangeConfig,
}

/// Simulated chain shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Items folded into the synthetic base; 0 or a power of two
    pub base_count: u64,
    /// Number of retained items after the base
    pub length: u64,
    /// Seed for the item digests
    pub seed: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            base_count: 16384,
            length: 2000,
            seed: 0,
        }
    }
}

/// Offsets into the retained chain, counted from its first item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofRangeConfig {
    /// Every proof starts at or after this item
    pub from_offset: u64,
    pub anchor_start_offset: u64,
    /// Last anchor, inclusive
    pub anchor_end_offset: u64,
}

impl Default for ProofRangeConfig {
    fn default() -> Self {
        Self {
            from_offset: 100,
            anchor_start_offset: 200,
            anchor_end_offset: 1990,
        }
    }
}

impl ChainConfig {
    /// Number of the first retained item
    pub fn first_item(&self) -> u64 {
        self.base_count + 1
    }

    /// Number of the last retained item
    pub fn last_item(&self) -> u64 {
        self.base_count + self.length
    }
}

impl SimulationConfig {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig =
            toml::from_str(&content).map_err(|e| MerkleError::ConfigurationError {
                reason: format!("Failed to parse {}: {}", path.display(), e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| MerkleError::ConfigurationError {
                reason: format!("Failed to serialize config: {}", e),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(MerkleError::HomeDirectoryNotFound)?;

        let blockroot_dir = user_dirs.home_dir().join(".blockroot");
        Ok(blockroot_dir.join("simulation.toml"))
    }

    /// Check that the base is a valid synthetic accumulator and that every
    /// configured proof fits inside the retained chain
    pub fn validate(&self) -> Result<()> {
        let chain = &self.chain;
        let proofs = &self.proofs;

        if chain.base_count != 0 && !chain.base_count.is_power_of_two() {
            return Err(MerkleError::configuration(format!(
                "base_count must be 0 or a power of two, got {}",
                chain.base_count
            )));
        }
        if chain.length == 0 {
            return Err(MerkleError::configuration("chain length must be positive"));
        }
        match chain.base_count.checked_add(chain.length) {
            Some(total) if total <= MAX_NODE_COUNT => {}
            _ => {
                return Err(MerkleError::configuration(format!(
                    "base_count {} plus length {} exceeds {} items",
                    chain.base_count, chain.length, MAX_NODE_COUNT
                )))
            }
        }
        if proofs.from_offset >= proofs.anchor_start_offset {
            return Err(MerkleError::configuration(format!(
                "from_offset {} must be below anchor_start_offset {}",
                proofs.from_offset, proofs.anchor_start_offset
            )));
        }
        if proofs.anchor_start_offset > proofs.anchor_end_offset {
            return Err(MerkleError::configuration(format!(
                "anchor_start_offset {} is past anchor_end_offset {}",
                proofs.anchor_start_offset, proofs.anchor_end_offset
            )));
        }
        if proofs.anchor_end_offset >= chain.length {
            return Err(MerkleError::configuration(format!(
                "anchor_end_offset {} is outside a chain of {} items",
                proofs.anchor_end_offset, chain.length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain.first_item(), 16385);
        assert_eq!(config.chain.last_item(), 18384);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("simulation.toml");
        std::fs::write(&path, "[chain]\nlength = 500\n\n[proofs]\nanchor_end_offset = 450\n")
            .unwrap();

        let config = SimulationConfig::load_from(&path).unwrap();
        assert_eq!(config.chain.length, 500);
        assert_eq!(config.chain.base_count, 16384);
        assert_eq!(config.proofs.anchor_end_offset, 450);
        assert_eq!(config.proofs.from_offset, 100);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("simulation.toml");

        let mut config = SimulationConfig::default();
        config.chain.seed = 42;
        config.save_to(&path).unwrap();

        assert_eq!(SimulationConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = SimulationConfig::default();
        config.chain.base_count = 1000;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.proofs.from_offset = 200;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.proofs.anchor_end_offset = 2000;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.chain.base_count = 0;
        assert!(config.validate().is_ok());

        let mut config = SimulationConfig::default();
        config.chain.base_count = MAX_NODE_COUNT;
        config.chain.length = 2;
        config.proofs = ProofRangeConfig {
            from_offset: 0,
            anchor_start_offset: 1,
            anchor_end_offset: 1,
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("simulation.toml");
        std::fs::write(&path, "[chain\nlength = ").unwrap();

        let err = SimulationConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, MerkleError::ConfigurationError { .. }));
    }
}
