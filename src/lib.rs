//! Blockroot - an append-only merkle accumulator with long-lived proofs
//!
//! Blockroot folds a sequence of item digests (e.g. block ids) into an
//! incremental merkle tree that keeps only its frontier, and proves that an
//! earlier item is committed by the accumulator a later anchor item carries.
//!
//! # Core Features
//!
//! - **Incremental Accumulator**: O(log n) state, O(log n) append, O(1) root
//! - **Canonical Pairing**: operand order is encoded in the hashed bytes
//! - **Anchor-Rooted Proofs**: proofs end in fully realized subtrees, so they
//!   stay valid as the accumulator grows
//! - **Snapshot Stores**: proofs read history through a small trait
//!
//! # Example Usage
//!
//! ```rust
//! use blockroot::{hash::sha256, MemoryStore, ProofGenerator, SnapshotStore};
//!
//! let store: MemoryStore = (1u64..=100).map(|n| sha256(&n.to_le_bytes())).collect();
//!
//! let proof = ProofGenerator::new(&store).prove(17, 90)?;
//! assert!(proof.verify());
//! assert!(proof.verify_against(&store.snapshot(90)?.merkle));
//! # Ok::<(), blockroot::MerkleError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod proofs;
pub mod simulation;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    error::{MerkleError, Result},
    hash,
    types::*,
};

pub use crate::config::SimulationConfig;
pub use crate::proofs::{IncrementalMerkle, MerkleTree, Proof, ProofElement, ProofGenerator, ProofPosition};
pub use crate::storage::{MemoryStore, Snapshot, SnapshotStore};

/// Version of the Blockroot crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
