//! Incremental merkle accumulator
//!
//! A balanced merkle tree built so that leaves can be appended without
//! recomputing inner nodes that cover a complete subset of earlier leaves.
//! Each append either implies a set of future nodes (a missing right child
//! is taken to be a copy of its left sibling) or realizes one of them.
//!
//! Once a subtree contains only realized nodes its root never changes, so a
//! proof against such a subtree stays valid while the accumulator keeps
//! growing.

use crate::core::{error::*, hash::hash_pair, types::*};
use crate::proofs::depth::{frontier_len, max_depth, MAX_NODE_COUNT};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

const FORMAT_NAME: &str = "incremental merkle";

/// Append-only merkle accumulator holding only its frontier.
///
/// The frontier stores, from the leaf layer upward, the root of every fully
/// realized subtree that a future append still needs, followed by the current
/// root. It is shared behind an `Arc`: every append publishes a fresh frontier,
/// so clones handed out earlier (e.g. inside snapshots) never change.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MerkleState", into = "MerkleState")]
pub struct IncrementalMerkle {
    node_count: u64,
    frontier: Arc<[Digest]>,
}

impl Default for IncrementalMerkle {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalMerkle {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            node_count: 0,
            frontier: Arc::from(Vec::new()),
        }
    }

    /// Rebuild an accumulator from its count and frontier.
    ///
    /// Rejects counts above [`MAX_NODE_COUNT`] and frontiers whose length does
    /// not match `node_count` or that fail [`self_check`](Self::self_check).
    pub fn from_parts(node_count: u64, frontier: Vec<Digest>) -> Result<Self> {
        if node_count > MAX_NODE_COUNT {
            return Err(MerkleError::invalid_format(
                FORMAT_NAME,
                format!("{} leaves exceed the limit of {}", node_count, MAX_NODE_COUNT),
            ));
        }
        let expected = frontier_len(node_count);
        if frontier.len() != expected {
            return Err(MerkleError::invalid_format(
                FORMAT_NAME,
                format!(
                    "{} leaves require {} frontier digests, found {}",
                    node_count,
                    expected,
                    frontier.len()
                ),
            ));
        }

        let merkle = Self {
            node_count,
            frontier: Arc::from(frontier),
        };
        if !merkle.self_check() {
            return Err(MerkleError::invalid_format(
                FORMAT_NAME,
                "frontier does not collapse to its recorded root",
            ));
        }
        Ok(merkle)
    }

    /// Add a leaf and return the new root.
    ///
    /// Walking up from the new leaf, a "left" node (even zero-based index) is
    /// paired with an implied copy of itself, which makes every node above it
    /// partial. A "right" node consumes the next left value from the old
    /// frontier. Left values met after the path turned partial are still
    /// needed by later appends and carry over; fully realized ones are
    /// dropped. The top of the collapse is always pushed last, where it serves
    /// as the root and, for a power-of-two count, as the one realized subtree.
    ///
    /// # Panics
    ///
    /// Panics if the accumulator already holds [`MAX_NODE_COUNT`] leaves.
    pub fn append(&mut self, digest: Digest) -> Digest {
        assert!(
            self.node_count < MAX_NODE_COUNT,
            "incremental merkle is full at {} leaves",
            MAX_NODE_COUNT
        );
        let depth = max_depth(self.node_count + 1);
        let mut index = self.node_count;
        let mut partial = false;
        let mut top = digest;
        let mut cursor = 0;
        let mut updated = Vec::with_capacity(depth as usize);

        for _ in 1..depth {
            if index & 1 == 0 {
                // a partial node can never be fully realized, so only record
                // the left value before the first implied sibling
                if !partial {
                    updated.push(top);
                }
                top = hash_pair(&top, &top);
                partial = true;
            } else {
                let left = self.frontier[cursor];
                cursor += 1;
                if partial {
                    updated.push(left);
                }
                top = hash_pair(&left, &top);
            }
            index >>= 1;
        }

        updated.push(top);
        self.frontier = Arc::from(updated);
        self.node_count += 1;
        top
    }

    /// Current root, or the zero sentinel for an empty accumulator
    pub fn root(&self) -> Digest {
        self.frontier.last().copied().unwrap_or_else(Digest::zero)
    }

    /// Number of leaves appended so far
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    pub fn frontier(&self) -> &[Digest] {
        &self.frontier
    }

    /// Layers of the implied balanced tree
    pub fn depth(&self) -> u32 {
        max_depth(self.node_count)
    }

    /// Recompute the root from the stored frontier alone and compare it with
    /// the recorded root.
    ///
    /// This is a structural self-consistency check; it says nothing about
    /// which leaves produced the frontier.
    pub fn self_check(&self) -> bool {
        if self.frontier.len() != frontier_len(self.node_count) {
            return false;
        }
        if self.frontier.len() <= 1 {
            return true;
        }

        let (root, lefts) = match self.frontier.split_last() {
            Some(split) => split,
            None => return false,
        };
        let mut lefts = lefts.iter();
        let mut index = self.node_count;
        let mut top: Option<Digest> = None;

        for _ in 1..max_depth(self.node_count) {
            top = match (index & 1 == 1, top) {
                (true, None) => {
                    let Some(left) = lefts.next() else {
                        return false;
                    };
                    Some(hash_pair(left, left))
                }
                (true, Some(partial)) => Some(hash_pair(&partial, &partial)),
                (false, Some(partial)) => {
                    let Some(left) = lefts.next() else {
                        return false;
                    };
                    Some(hash_pair(left, &partial))
                }
                (false, None) => None,
            };
            index = (index + 1) >> 1;
        }

        lefts.next().is_none() && top.as_ref() == Some(root)
    }

    /// Fully realized subtree roots held by the frontier, leaf layer upward
    pub fn realized_nodes(&self) -> RealizedNodes<'_> {
        RealizedNodes {
            frontier: &self.frontier,
            index: self.node_count,
            layer: 1,
            max_layer: self.depth(),
            cursor: 0,
        }
    }

    /// Digest of the realized node at exactly `position`, if the frontier
    /// holds it
    pub fn realized_node(&self, position: NodePosition) -> Option<Digest> {
        self.realized_nodes()
            .take_while(|node| node.position.layer <= position.layer)
            .find(|node| node.position == position)
            .map(|node| node.digest)
    }

    /// Size of the serialized form in bytes
    pub fn encoded_len(&self) -> usize {
        8 + 4 + self.frontier.len() * DIGEST_LEN
    }

    /// Write the stable layout: `u64` count, `u32` frontier length, digests
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.node_count)?;
        writer.write_u32::<LittleEndian>(self.frontier.len() as u32)?;
        for digest in self.frontier.iter() {
            writer.write_all(digest.as_bytes())?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let node_count = reader.read_u64::<LittleEndian>().map_err(read_error)?;
        let len = reader.read_u32::<LittleEndian>().map_err(read_error)? as usize;

        // check before allocating so a corrupt length cannot balloon memory
        let expected = frontier_len(node_count);
        if len != expected {
            return Err(MerkleError::invalid_format(
                FORMAT_NAME,
                format!(
                    "{} leaves require {} frontier digests, header says {}",
                    node_count, expected, len
                ),
            ));
        }

        let mut frontier = Vec::with_capacity(len);
        for _ in 0..len {
            let mut bytes = [0u8; DIGEST_LEN];
            reader.read_exact(&mut bytes).map_err(read_error)?;
            frontier.push(Digest::from_bytes(bytes));
        }
        Self::from_parts(node_count, frontier)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.encoded_len());
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        buffer
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let merkle = Self::read_from(&mut cursor)?;
        if cursor.position() as usize != bytes.len() {
            return Err(MerkleError::invalid_format(
                FORMAT_NAME,
                format!(
                    "{} trailing bytes",
                    bytes.len() - cursor.position() as usize
                ),
            ));
        }
        Ok(merkle)
    }
}

fn read_error(err: io::Error) -> MerkleError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        MerkleError::invalid_format(FORMAT_NAME, "truncated input")
    } else {
        MerkleError::Io(err)
    }
}

impl fmt::Debug for IncrementalMerkle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalMerkle")
            .field("node_count", &self.node_count)
            .field("frontier", &self.frontier)
            .finish()
    }
}

/// Plain serde shape of an accumulator, validated on the way in
#[derive(Serialize, Deserialize)]
struct MerkleState {
    node_count: u64,
    frontier: Vec<Digest>,
}

impl TryFrom<MerkleState> for IncrementalMerkle {
    type Error = MerkleError;

    fn try_from(state: MerkleState) -> Result<Self> {
        Self::from_parts(state.node_count, state.frontier)
    }
}

impl From<IncrementalMerkle> for MerkleState {
    fn from(merkle: IncrementalMerkle) -> Self {
        Self {
            node_count: merkle.node_count,
            frontier: merkle.frontier.to_vec(),
        }
    }
}

/// Root of a fully realized subtree held in a frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealizedNode {
    pub position: NodePosition,
    pub digest: Digest,
}

impl RealizedNode {
    pub fn leaf_range(&self) -> (ItemNumber, ItemNumber) {
        self.position.leaf_range()
    }

    pub fn contains(&self, item: ItemNumber) -> bool {
        self.position.contains(item)
    }
}

/// Iterator over the realized nodes of an [`IncrementalMerkle`]
pub struct RealizedNodes<'a> {
    frontier: &'a [Digest],
    index: u64,
    layer: u32,
    max_layer: u32,
    cursor: usize,
}

impl Iterator for RealizedNodes<'_> {
    type Item = RealizedNode;

    fn next(&mut self) -> Option<RealizedNode> {
        while self.layer <= self.max_layer {
            let layer = self.layer;
            let index = self.index;
            self.layer += 1;
            self.index >>= 1;

            // a set bit means a complete left subtree at this layer
            if index & 1 == 1 {
                let digest = *self.frontier.get(self.cursor)?;
                self.cursor += 1;
                return Some(RealizedNode {
                    position: NodePosition::new(layer, index),
                    digest,
                });
            }
        }
        None
    }
}
