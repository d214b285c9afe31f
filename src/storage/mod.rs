//! Snapshot storage for Blockroot
//!
//! The proof generator never mutates history; it only reads snapshots through
//! the [`SnapshotStore`] contract. [`MemoryStore`] is the in-memory chain used
//! by the simulator and the tests.

pub mod memory;
pub mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotStore};
