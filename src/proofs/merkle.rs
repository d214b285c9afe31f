//! Full-rebuild merkle tree
//!
//! Hashes every layer of the balanced tree from scratch, duplicating the last
//! node of any odd-length layer. This is the reference the incremental
//! accumulator must agree with for every prefix of leaves.

use crate::core::{hash::hash_pair, types::*};

/// Merkle tree with every layer materialized
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// All levels of the tree (leaves at index 0), before padding
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a merkle tree from a list of leaf digests
    pub fn from_leaves(leaves: &[Digest]) -> Self {
        if leaves.is_empty() {
            return Self { levels: Vec::new() };
        }

        let mut levels = vec![leaves.to_vec()];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [single] => hash_pair(single, single),
                    _ => unreachable!("chunks(2) yields one or two items"),
                })
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    /// Root digest, or the zero sentinel for an empty tree
    pub fn root(&self) -> Digest {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_else(Digest::zero)
    }

    pub fn leaf_count(&self) -> u64 {
        self.levels.first().map_or(0, |leaves| leaves.len() as u64)
    }

    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Digest at `position` (1-based layer and position), if it exists
    pub fn node(&self, position: NodePosition) -> Option<Digest> {
        let level = self.levels.get(position.layer.checked_sub(1)? as usize)?;
        level.get(position.position.checked_sub(1)? as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::sha256;

    #[test]
    fn test_empty_tree() {
        let tree = MerkleTree::from_leaves(&[]);
        assert_eq!(tree.root(), Digest::zero());
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.levels().is_empty());
    }

    #[test]
    fn test_three_leaves_pad_by_duplication() {
        let leaves: Vec<_> = [b"a", b"b", b"c"].iter().map(|l| sha256(*l)).collect();
        let tree = MerkleTree::from_leaves(&leaves);

        let expected = hash_pair(
            &hash_pair(&leaves[0], &leaves[1]),
            &hash_pair(&leaves[2], &leaves[2]),
        );
        assert_eq!(tree.root(), expected);
        assert_eq!(tree.levels().len(), 3);
        assert_eq!(tree.node(NodePosition::new(2, 2)), Some(hash_pair(&leaves[2], &leaves[2])));
        assert_eq!(tree.node(NodePosition::new(1, 4)), None);
        assert_eq!(tree.node(NodePosition::new(0, 1)), None);
    }
}
