//! Snapshots and the store contract the proof generator reads from

use crate::core::{error::*, types::*};
use crate::proofs::incremental::IncrementalMerkle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What an item committed to when it was produced.
///
/// `merkle` is the accumulator over every earlier item, i.e. the state right
/// after item `number - 1` was appended, so `merkle.node_count()` is always
/// `number - 1`. A block header carrying the root of all previous block ids
/// has exactly this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Item number (1-based)
    pub number: ItemNumber,
    /// The item's own digest
    pub digest: Digest,
    /// Accumulator over items before this one
    pub merkle: IncrementalMerkle,
}

impl Snapshot {
    pub fn new(number: ItemNumber, digest: Digest, merkle: IncrementalMerkle) -> Self {
        Self {
            number,
            digest,
            merkle,
        }
    }

    /// Whether the accumulator count lines up with the item number
    pub fn is_consistent(&self) -> bool {
        self.number >= 1 && self.merkle.node_count() == self.number - 1
    }
}

/// Read access to retained snapshots.
///
/// Implementations must answer for every item of their committed range and
/// report anything outside it as [`MerkleError::OutOfRange`].
pub trait SnapshotStore {
    fn snapshot(&self, number: ItemNumber) -> Result<Snapshot>;

    /// The item's own digest
    fn digest(&self, number: ItemNumber) -> Result<Digest> {
        Ok(self.snapshot(number)?.digest)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn snapshot(&self, number: ItemNumber) -> Result<Snapshot> {
        (**self).snapshot(number)
    }

    fn digest(&self, number: ItemNumber) -> Result<Digest> {
        (**self).digest(number)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    fn snapshot(&self, number: ItemNumber) -> Result<Snapshot> {
        (**self).snapshot(number)
    }

    fn digest(&self, number: ItemNumber) -> Result<Digest> {
        (**self).digest(number)
    }
}

/// One writer appends behind the lock while provers read; each read copies
/// the snapshot out, so no lock is held while a proof is assembled.
impl<S: SnapshotStore> SnapshotStore for RwLock<S> {
    fn snapshot(&self, number: ItemNumber) -> Result<Snapshot> {
        self.read().snapshot(number)
    }

    fn digest(&self, number: ItemNumber) -> Result<Digest> {
        self.read().digest(number)
    }
}
