//! Simulate command implementation

use super::load_config;
use crate::simulation;
use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Execute the simulate command
pub fn execute(
    config: Option<PathBuf>,
    length: Option<u64>,
    seed: Option<u64>,
    base: Option<u64>,
    json: bool,
    quiet: bool,
    no_progress: bool,
) -> Result<()> {
    let mut config = load_config(config.as_deref())?;
    if let Some(length) = length {
        config.chain.length = length;
    }
    if let Some(seed) = seed {
        config.chain.seed = seed;
    }
    if let Some(base) = base {
        config.chain.base_count = base;
    }
    config.validate()?;

    if !quiet && !json {
        println!("{}", "Simulating chain...".bright_blue());
        println!(
            "  {} items {}..={} on a base of {}",
            "•".cyan(),
            config.chain.first_item(),
            config.chain.last_item(),
            config.chain.base_count
        );
    }

    let progress = if quiet || no_progress || json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} anchors {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar
    };

    let report = simulation::run(&config, |done, total| {
        progress.set_length(total);
        progress.set_position(done);
    })?;
    progress.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        println!(
            "  {} {} of {} proofs verified",
            "•".cyan(),
            report.verified.to_string().bold(),
            report.proofs
        );
        for failure in report.failures.iter().take(10) {
            println!(
                "  {} from {} anchor {}: {}",
                "✗".red(),
                failure.from,
                failure.anchor,
                failure.reason
            );
        }
    }

    if !report.is_success() {
        bail!("{} proofs failed", report.failures.len());
    }

    if !quiet && !json {
        println!("{} Simulation passed", "✓".green().bold());
    }
    Ok(())
}
