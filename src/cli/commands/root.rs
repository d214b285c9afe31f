//! Root command implementation

use crate::core::types::Digest;
use crate::proofs::{IncrementalMerkle, MerkleTree};
use anyhow::{bail, Context, Result};
use colored::Colorize;

/// Execute the root command
pub fn execute(digests: Vec<String>, json: bool) -> Result<()> {
    let leaves = digests
        .iter()
        .map(|hex| Digest::from_hex(hex).with_context(|| format!("Invalid digest: {}", hex)))
        .collect::<Result<Vec<_>>>()?;

    let mut merkle = IncrementalMerkle::new();
    for leaf in &leaves {
        merkle.append(*leaf);
    }

    let oracle = MerkleTree::from_leaves(&leaves).root();
    if merkle.root() != oracle || !merkle.self_check() {
        bail!("Accumulator disagrees with a full rebuild of the same leaves");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&merkle)?);
        return Ok(());
    }

    println!("{}", "Accumulator".bold());
    println!("  {} Leaves: {}", "•".cyan(), merkle.node_count());
    println!("  {} Depth: {}", "•".cyan(), merkle.depth());
    println!("  {} Root: {}", "•".cyan(), merkle.root().to_hex().bright_white());
    println!("  {} Realized nodes:", "•".cyan());
    for node in merkle.realized_nodes() {
        let (first, last) = node.leaf_range();
        println!(
            "      {} items {}..={} {}",
            node.position,
            first,
            last,
            node.digest.to_hex().dimmed()
        );
    }
    println!("{} Matches full rebuild", "✓".green().bold());
    Ok(())
}
