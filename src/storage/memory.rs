//! In-memory snapshot store

use crate::core::{error::*, types::*};
use crate::proofs::incremental::IncrementalMerkle;
use crate::storage::snapshot::{Snapshot, SnapshotStore};

/// Append-only chain of snapshots kept in memory.
///
/// Each pushed digest becomes the next item; its snapshot captures the
/// accumulator as it stood before the digest was appended.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    first: ItemNumber,
    snapshots: Vec<Snapshot>,
    merkle: IncrementalMerkle,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store whose first item will be number 1
    pub fn new() -> Self {
        Self::from_base(IncrementalMerkle::new())
    }

    /// Start from an existing accumulator, e.g. a synthetic base standing in
    /// for history that is not retained. The first stored item is
    /// `base.node_count() + 1`.
    pub fn from_base(base: IncrementalMerkle) -> Self {
        Self {
            first: base.node_count() + 1,
            snapshots: Vec::new(),
            merkle: base,
        }
    }

    /// Record the next item and fold it into the running accumulator
    pub fn push(&mut self, digest: Digest) -> &Snapshot {
        let number = self.first + self.snapshots.len() as u64;
        self.snapshots
            .push(Snapshot::new(number, digest, self.merkle.clone()));
        self.merkle.append(digest);
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// First retained item number
    pub fn first(&self) -> ItemNumber {
        self.first
    }

    /// Last retained item number
    pub fn head(&self) -> Option<ItemNumber> {
        self.snapshots.last().map(|snapshot| snapshot.number)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Accumulator including every pushed item
    pub fn merkle(&self) -> &IncrementalMerkle {
        &self.merkle
    }

    pub fn get(&self, number: ItemNumber) -> Option<&Snapshot> {
        let offset = number.checked_sub(self.first)?;
        self.snapshots.get(usize::try_from(offset).ok()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}

impl Extend<Digest> for MemoryStore {
    fn extend<I: IntoIterator<Item = Digest>>(&mut self, digests: I) {
        for digest in digests {
            self.push(digest);
        }
    }
}

impl FromIterator<Digest> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Digest>>(digests: I) -> Self {
        let mut store = Self::new();
        store.extend(digests);
        store
    }
}

impl SnapshotStore for MemoryStore {
    fn snapshot(&self, number: ItemNumber) -> Result<Snapshot> {
        self.get(number).cloned().ok_or_else(|| {
            let reason = match self.head() {
                Some(head) => format!("store holds items {}..={}", self.first, head),
                None => "store is empty".to_string(),
            };
            MerkleError::out_of_range(number, reason)
        })
    }
}
