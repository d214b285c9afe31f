//! Prove command implementation

use super::load_config;
use crate::proofs::ProofGenerator;
use crate::simulation::SimulatedChain;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the prove command
pub fn execute(
    from: u64,
    anchor: u64,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let chain = SimulatedChain::build(&config.chain)?;

    let proof = ProofGenerator::new(chain.store())
        .prove(from, anchor)
        .with_context(|| format!("Failed to prove item {} against anchor {}", from, anchor))?;
    let json = proof.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write proof to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Proof of item {} against anchor {} written to {}",
                    "✓".green().bold(),
                    from,
                    anchor,
                    path.display().to_string().cyan()
                );
                println!("  {} {} elements", "•".cyan(), proof.len());
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}
