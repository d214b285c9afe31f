//! Merkle accumulator and proof system for Blockroot
//!
//! This module provides the append-only accumulator, the full-rebuild tree it
//! is checked against, and proofs that connect an earlier item to a fully
//! realized subtree of a later anchor.

pub mod depth;
pub mod generator;
pub mod incremental;
pub mod merkle;
pub mod proof;

// Re-export commonly used items
pub use depth::{frontier_len, max_depth, next_power_of_2, MAX_NODE_COUNT};
pub use generator::ProofGenerator;
pub use incremental::{IncrementalMerkle, RealizedNode, RealizedNodes};
pub use merkle::MerkleTree;
pub use proof::{verify_path, Proof, ProofElement, ProofPosition, PROOF_VERSION};
