//! Command-line interface for Blockroot

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Blockroot - incremental merkle accumulator and anchor-rooted proofs
#[derive(Parser)]
#[command(
    name = "blockroot",
    version,
    about = "Incremental merkle accumulator with proofs against later anchors",
    long_about = "Blockroot folds an append-only sequence of digests into a merkle accumulator and proves that an earlier item is committed by the accumulator of a later anchor item."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto", global = true)]
    pub color: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a simulated chain and verify every configured proof
    Simulate {
        /// Simulation config file (default: ~/.blockroot/simulation.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of retained items
        #[arg(long)]
        length: Option<u64>,

        /// Override the digest seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the synthetic base size (0 or a power of two)
        #[arg(long)]
        base: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prove that an item is committed by a later anchor of the simulated chain
    Prove {
        /// Item to prove
        #[arg(long)]
        from: u64,

        /// Anchor item whose accumulator the proof ends in
        #[arg(long)]
        anchor: u64,

        /// Simulation config file describing the chain
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the proof to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a JSON proof
    Verify {
        /// Proof file
        proof: PathBuf,

        /// Also check the proof ends in a realized node of its anchor on the
        /// simulated chain
        #[arg(long)]
        anchored: bool,

        /// Simulation config file describing the chain
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Fold hex digests into an accumulator and show its root
    Root {
        /// Leaf digests as 64-character hex strings
        #[arg(required = true)]
        digests: Vec<String>,

        /// Print the accumulator as JSON
        #[arg(long)]
        json: bool,
    },
}
