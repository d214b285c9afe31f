//! Blockroot CLI
//!
//! Command-line interface for the Blockroot accumulator and proof system.

use anyhow::Result;
use blockroot::cli::{self, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {}
    }

    // Initialize logging; stdout is reserved for command output
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Execute the command
    match cli.command {
        Commands::Simulate {
            config,
            length,
            seed,
            base,
            json,
        } => cli::commands::simulate::execute(
            config,
            length,
            seed,
            base,
            json,
            cli.quiet,
            cli.no_progress,
        ),
        Commands::Prove {
            from,
            anchor,
            config,
            output,
        } => cli::commands::prove::execute(from, anchor, config, output, cli.quiet),
        Commands::Verify {
            proof,
            anchored,
            config,
        } => cli::commands::verify::execute(proof, anchored, config, cli.verbose, cli.quiet),
        Commands::Root { digests, json } => cli::commands::root::execute(digests, json),
    }
}
