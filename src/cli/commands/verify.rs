//! Verify command implementation

use super::load_config;
use crate::proofs::Proof;
use crate::simulation::SimulatedChain;
use crate::storage::SnapshotStore;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the verify command
pub fn execute(
    proof: PathBuf,
    anchored: bool,
    config: Option<PathBuf>,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let json = std::fs::read_to_string(&proof)
        .with_context(|| format!("Failed to read proof from {}", proof.display()))?;
    let proof = Proof::from_json(&json)?;

    if verbose {
        println!("Proof of item {} against anchor {}", proof.from, proof.anchor);
        for element in &proof.elements {
            println!("  {:?} {}", element.position, element.digest);
        }
    }

    if !proof.verify() {
        bail!("Proof is invalid");
    }

    if anchored {
        let config = load_config(config.as_deref())?;
        let chain = SimulatedChain::build(&config.chain)?;
        let anchor = chain.store().snapshot(proof.anchor)?;
        if !proof.verify_against(&anchor.merkle) {
            bail!(
                "Proof does not end in a realized node of anchor {}",
                proof.anchor
            );
        }
    }

    if !quiet {
        println!("{} Proof verified successfully!", "✓".green().bold());
        if let Some(root) = proof.sealed_root() {
            println!("  {} Subtree root: {}", "•".cyan(), root.to_hex().dimmed());
        }
    }
    Ok(())
}
