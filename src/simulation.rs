//! Simulated chain for exercising proofs end to end
//!
//! Builds a chain of pseudo-random item digests on top of a synthetic base
//! accumulator, then proves and verifies every `(from, anchor)` pair in the
//! configured ranges.

use crate::config::{ChainConfig, SimulationConfig};
use crate::core::{error::*, hash::sha256, types::*};
use crate::proofs::{IncrementalMerkle, ProofGenerator};
use crate::storage::{MemoryStore, SnapshotStore};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A seeded in-memory chain
#[derive(Debug, Clone)]
pub struct SimulatedChain {
    store: MemoryStore,
}

impl SimulatedChain {
    /// Build the chain described by `config`.
    ///
    /// A non-zero `base_count` becomes a synthetic accumulator whose single
    /// frontier digest is derived from the seed, standing in for history that
    /// is not retained.
    pub fn build(config: &ChainConfig) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);

        let base = if config.base_count == 0 {
            IncrementalMerkle::new()
        } else {
            let mut bytes = [0u8; DIGEST_LEN];
            rng.fill_bytes(&mut bytes);
            IncrementalMerkle::from_parts(config.base_count, vec![sha256(&bytes)])
                .map_err(|e| MerkleError::configuration(format!("invalid base: {}", e)))?
        };

        let mut store = MemoryStore::from_base(base);
        for _ in 0..config.length {
            let mut bytes = [0u8; DIGEST_LEN];
            rng.fill_bytes(&mut bytes);
            store.push(Digest::from_bytes(bytes));
        }

        debug!(
            first = store.first(),
            head = ?store.head(),
            root = %store.merkle().root(),
            "built simulated chain"
        );
        Ok(Self { store })
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

/// A proof that could not be built or did not verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationFailure {
    pub from: ItemNumber,
    pub anchor: ItemNumber,
    pub reason: String,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Proofs attempted
    pub proofs: u64,
    /// Proofs that verified against their anchor
    pub verified: u64,
    pub failures: Vec<SimulationFailure>,
}

impl SimulationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.proofs == self.verified
    }
}

/// Prove and verify every configured `(from, anchor)` pair.
///
/// `on_anchor` is called after each anchor with the number of anchors done
/// and the total, for progress reporting.
pub fn run<F>(config: &SimulationConfig, mut on_anchor: F) -> Result<SimulationReport>
where
    F: FnMut(u64, u64),
{
    config.validate()?;

    let chain = SimulatedChain::build(&config.chain)?;
    let store = chain.store();
    let generator = ProofGenerator::new(store);

    let first = config.chain.first_item();
    let from_start = first + config.proofs.from_offset;
    let anchor_start = first + config.proofs.anchor_start_offset;
    let anchor_end = first + config.proofs.anchor_end_offset;
    let total = anchor_end - anchor_start + 1;

    info!(first, anchor_start, anchor_end, "starting simulation");

    let mut report = SimulationReport::default();
    for (done, anchor) in (anchor_start..=anchor_end).enumerate() {
        let snapshot = store.snapshot(anchor)?;

        for from in from_start..anchor {
            report.proofs += 1;
            let outcome = generator
                .prove_with_anchor(from, &snapshot)
                .and_then(|proof| {
                    let leaf = store.digest(from)?;
                    if !proof.verify_against(&snapshot.merkle) {
                        Err(MerkleError::internal("proof does not verify"))
                    } else if proof.leaf_digest() != Some(leaf) {
                        Err(MerkleError::internal("proof does not start at the item"))
                    } else {
                        Ok(())
                    }
                });

            match outcome {
                Ok(()) => report.verified += 1,
                Err(e) => report.failures.push(SimulationFailure {
                    from,
                    anchor,
                    reason: e.to_string(),
                }),
            }
        }

        on_anchor(done as u64 + 1, total);
    }

    info!(
        proofs = report.proofs,
        verified = report.verified,
        failures = report.failures.len(),
        "simulation finished"
    );
    Ok(report)
}
