//! Anchor-rooted merkle proofs and their verification

use crate::core::{error::*, hash::hash_pair, types::*};
use crate::proofs::incremental::IncrementalMerkle;
use serde::{Deserialize, Serialize};

/// Current proof format version
pub const PROOF_VERSION: &str = "1.0";

/// Which side of the running value an intermediate element sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofPosition {
    Left,
    Right,
    /// Seed leaves and the sealing root carry no orientation
    #[serde(rename = "none")]
    Untagged,
}

/// A single element in a merkle proof path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofElement {
    pub digest: Digest,
    pub position: ProofPosition,
}

impl ProofElement {
    pub fn untagged(digest: Digest) -> Self {
        Self {
            digest,
            position: ProofPosition::Untagged,
        }
    }

    pub fn left(digest: Digest) -> Self {
        Self {
            digest,
            position: ProofPosition::Left,
        }
    }

    pub fn right(digest: Digest) -> Self {
        Self {
            digest,
            position: ProofPosition::Right,
        }
    }
}

/// Path connecting an item to a realized subtree root of a later anchor.
///
/// Layout of `elements`:
/// - one element: the item's own leaf, which the anchor holds as a realized
///   node (e.g. an anchor over a single item)
/// - otherwise: the two leaves of the item's pair in item order, then one
///   tagged sibling per intermediate layer, then the realized subtree root
///   from the anchor's frontier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Version of the proof format
    pub version: String,
    /// Item being proved
    pub from: ItemNumber,
    /// Item whose accumulator the proof ends in
    pub anchor: ItemNumber,
    /// Proof path elements
    pub elements: Vec<ProofElement>,
}

impl Proof {
    pub fn new(from: ItemNumber, anchor: ItemNumber, elements: Vec<ProofElement>) -> Self {
        Self {
            version: PROOF_VERSION.to_string(),
            from,
            anchor,
            elements,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Recompute the path and compare it with the sealing element
    pub fn verify(&self) -> bool {
        verify_path(&self.elements)
    }

    /// Verify the path and check that its seal is a realized node of the
    /// anchor accumulator
    pub fn verify_against(&self, anchor: &IncrementalMerkle) -> bool {
        let Some(sealed) = self.sealed_root() else {
            return false;
        };
        self.verify() && anchor.realized_nodes().any(|node| node.digest == sealed)
    }

    /// The subtree root the path ends in
    pub fn sealed_root(&self) -> Option<Digest> {
        self.elements.last().map(|element| element.digest)
    }

    /// Digest of the proved item, taken from the seed pair
    pub fn leaf_digest(&self) -> Option<Digest> {
        let index = match self.elements.len() {
            0 | 2 => return None,
            1 => 0,
            _ if self.from % 2 == 1 => 0,
            _ => 1,
        };
        self.elements.get(index).map(|element| element.digest)
    }

    /// Serialize proof to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MerkleError::JsonSerialization)
    }

    /// Deserialize proof from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MerkleError::JsonSerialization)
    }
}

/// Fold a proof path.
///
/// The first two elements are hashed together, then each of the `len - 3`
/// intermediates is folded in on the side its tag names, and the result must
/// equal the last element. A single element is trivially valid; empty and
/// two-element paths are not.
pub fn verify_path(elements: &[ProofElement]) -> bool {
    match elements {
        [] => false,
        [_] => true,
        [_, _] => false,
        [first, second, intermediates @ .., sealed] => {
            let untagged = |element: &ProofElement| element.position == ProofPosition::Untagged;
            if !(untagged(first) && untagged(second) && untagged(sealed)) {
                return false;
            }

            let mut running = hash_pair(&first.digest, &second.digest);
            for element in intermediates {
                running = match element.position {
                    ProofPosition::Left => hash_pair(&element.digest, &running),
                    ProofPosition::Right => hash_pair(&running, &element.digest),
                    ProofPosition::Untagged => return false,
                };
            }
            running == sealed.digest
        }
    }
}
