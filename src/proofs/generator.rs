//! Builds proofs that an earlier item is committed by a later anchor

use crate::core::{error::*, hash::hash_pair, types::*};
use crate::proofs::incremental::{IncrementalMerkle, RealizedNode};
use crate::proofs::proof::{Proof, ProofElement};
use crate::storage::snapshot::{Snapshot, SnapshotStore};
use tracing::debug;

/// Proof generator reading historical snapshots from a store.
///
/// The proof ends in a fully realized subtree root of the anchor accumulator,
/// never in its current root, so it keeps verifying however many items are
/// appended afterwards.
pub struct ProofGenerator<'a, S: SnapshotStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SnapshotStore + ?Sized> ProofGenerator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Prove that item `from` is committed by the accumulator of `anchor`
    pub fn prove(&self, from: ItemNumber, anchor: ItemNumber) -> Result<Proof> {
        check_order(from, anchor)?;
        let anchor = self.fetch(anchor)?;
        self.prove_with_anchor(from, &anchor)
    }

    /// Same as [`prove`](Self::prove) with the anchor snapshot already in hand
    pub fn prove_with_anchor(&self, from: ItemNumber, anchor: &Snapshot) -> Result<Proof> {
        check_order(from, anchor.number)?;
        if !anchor.is_consistent() {
            return Err(MerkleError::internal_consistency(format!(
                "anchor {} holds an accumulator over {} items",
                anchor.number,
                anchor.merkle.node_count()
            )));
        }
        let covering = covering_node(&anchor.merkle, from)?;
        debug!(
            from,
            anchor = anchor.number,
            covering = %covering.position,
            "building proof"
        );

        if covering.position.layer == 1 {
            return Ok(Proof::new(
                from,
                anchor.number,
                vec![ProofElement::untagged(covering.digest)],
            ));
        }

        let siblings = sibling_path(from, covering.position)?;

        let leaf = NodePosition::leaf(from);
        let (left, right) = if leaf.is_left() {
            (from, from + 1)
        } else {
            (from - 1, from)
        };

        let mut elements = Vec::with_capacity(siblings.len() + 3);
        elements.push(ProofElement::untagged(self.fetch(left)?.digest));
        elements.push(ProofElement::untagged(self.fetch(right)?.digest));
        for sibling in siblings {
            elements.push(self.resolve(sibling, &anchor.merkle)?);
        }
        elements.push(ProofElement::untagged(covering.digest));

        Ok(Proof::new(from, anchor.number, elements))
    }

    /// Digest of a node that lies off the proof path
    fn resolve(&self, position: NodePosition, anchor: &IncrementalMerkle) -> Result<ProofElement> {
        let (_, last) = position.leaf_range();

        if position.is_left() {
            if let Some(digest) = anchor.realized_node(position) {
                return Ok(ProofElement::left(digest));
            }
            // the item right after a complete left subtree commits to it
            let snapshot = self.fetch(last + 1)?;
            let digest = snapshot.merkle.realized_node(position).ok_or_else(|| {
                MerkleError::internal_consistency(format!(
                    "snapshot {} does not realize node {}",
                    snapshot.number, position
                ))
            })?;
            debug!(node = %position, source = snapshot.number, "resolved left sibling");
            return Ok(ProofElement::left(digest));
        }

        // rebuild a right subtree from its last leaf and the realized left
        // neighbours that leaf's snapshot still holds
        let snapshot = self.fetch(last)?;
        let mut nodes = snapshot.merkle.realized_nodes();
        let mut top = snapshot.digest;
        for layer in 1..position.layer {
            let expected = NodePosition::new(layer, (last - 1) >> (layer - 1));
            let node = nodes
                .next()
                .filter(|node| node.position == expected)
                .ok_or_else(|| {
                    MerkleError::internal_consistency(format!(
                        "snapshot {} is missing node {}",
                        snapshot.number, expected
                    ))
                })?;
            top = hash_pair(&node.digest, &top);
        }
        debug!(node = %position, source = snapshot.number, "resolved right sibling");
        Ok(ProofElement::right(top))
    }

    /// Fetch a snapshot and check it describes the item asked for
    fn fetch(&self, number: ItemNumber) -> Result<Snapshot> {
        let snapshot = self.store.snapshot(number)?;
        if snapshot.number != number || !snapshot.is_consistent() {
            return Err(MerkleError::internal_consistency(format!(
                "store returned item {} with {} committed items for item {}",
                snapshot.number,
                snapshot.merkle.node_count(),
                number
            )));
        }
        Ok(snapshot)
    }
}

fn check_order(from: ItemNumber, anchor: ItemNumber) -> Result<()> {
    if from == 0 {
        return Err(MerkleError::invalid_input("item numbers start at 1"));
    }
    if from >= anchor {
        return Err(MerkleError::invalid_input(format!(
            "item {} is not earlier than anchor {}",
            from, anchor
        )));
    }
    Ok(())
}

/// Lowest realized node of the anchor whose subtree holds `from`
fn covering_node(anchor: &IncrementalMerkle, from: ItemNumber) -> Result<RealizedNode> {
    anchor
        .realized_nodes()
        .find(|node| node.contains(from))
        .ok_or_else(|| {
            MerkleError::internal_consistency(format!(
                "no realized node of a {}-item accumulator covers item {}",
                anchor.node_count(),
                from
            ))
        })
}

/// Siblings of the path nodes strictly between the leaf pair and `covering`
fn sibling_path(from: ItemNumber, covering: NodePosition) -> Result<Vec<NodePosition>> {
    let mut node = NodePosition::leaf(from);
    let mut siblings = Vec::with_capacity(covering.layer.saturating_sub(2) as usize);

    while node.layer + 1 < covering.layer {
        node = node.parent();
        siblings.push(node.sibling());
    }

    if node.parent() != covering {
        return Err(MerkleError::internal_consistency(format!(
            "path from item {} ends at {}, expected {}",
            from,
            node.parent(),
            covering
        )));
    }
    Ok(siblings)
}
