//! Core types and utilities for Blockroot
//!
//! This module contains the digest type, tree geometry, error handling,
//! and the canonical pairing used by every hash in the crate.

pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used items
pub use error::{MerkleError, Result};
pub use hash::{canonical_pair, hash_pair, sha256, CanonicalPair};
pub use types::{Digest, ItemNumber, NodePosition, DIGEST_LEN};
