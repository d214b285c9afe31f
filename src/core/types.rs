//! Core data types for Blockroot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length in bytes of a [`Digest`]
pub const DIGEST_LEN: usize = 32;

/// 32-byte SHA-256 digest
///
/// The all-zero value is reserved as the "absent" sentinel, e.g. the root of
/// an empty accumulator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Create a Digest from a 32-byte array
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Create a Digest from a hex string
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex)?;
        if bytes.len() != DIGEST_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut array = [0u8; DIGEST_LEN];
        array.copy_from_slice(&bytes);
        Ok(Digest(array))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The all-zero sentinel
    pub const fn zero() -> Self {
        Digest([0u8; DIGEST_LEN])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; DIGEST_LEN]
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &hex::encode(self.0)[..8])
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Digests travel as hex strings in JSON proofs and reports
impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_string = String::deserialize(deserializer)?;
        Digest::from_hex(&hex_string).map_err(serde::de::Error::custom)
    }
}

/// 1-based number of an item in the append-only sequence
pub type ItemNumber = u64;

/// Location of a node in the implied balanced tree.
///
/// Layers count upward from the leaves (layer 1) and positions count from
/// the left starting at 1, so a leaf's position is its item number:
///
/// ```text
///                 * root            layer 5
///         *               *         layer 4
///     *       *       *       *     layer 3
///   *   *   *   *   *   *   *   *   layer 2
///  * * * * * * * * * * * * * * * *  layer 1 (leaves)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePosition {
    pub layer: u32,
    pub position: u64,
}

impl NodePosition {
    pub const fn new(layer: u32, position: u64) -> Self {
        Self { layer, position }
    }

    /// Position of the leaf holding `item`
    pub const fn leaf(item: ItemNumber) -> Self {
        Self::new(1, item)
    }

    /// Odd positions are left children, even positions right children
    pub const fn is_left(&self) -> bool {
        self.position & 1 == 1
    }

    pub const fn parent(&self) -> Self {
        Self::new(self.layer + 1, (self.position + 1) >> 1)
    }

    pub const fn sibling(&self) -> Self {
        if self.is_left() {
            Self::new(self.layer, self.position + 1)
        } else {
            Self::new(self.layer, self.position - 1)
        }
    }

    /// Inclusive range of item numbers covered by this node
    pub const fn leaf_range(&self) -> (ItemNumber, ItemNumber) {
        let shift = self.layer - 1;
        let last = self.position << shift;
        let first = last - (1u64 << shift) + 1;
        (first, last)
    }

    pub const fn contains(&self, item: ItemNumber) -> bool {
        let (first, last) = self.leaf_range();
        first <= item && item <= last
    }
}

impl fmt::Display for NodePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.layer, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = Digest::from_bytes([0xab; DIGEST_LEN]);
        let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);
        assert!(Digest::from_hex("abcd").is_err());
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Digest::zero().is_zero());
        assert_eq!(Digest::default(), Digest::zero());
        assert!(!Digest::from_bytes([1; DIGEST_LEN]).is_zero());
    }

    #[test]
    fn test_digest_serde_is_hex_string() {
        let digest = Digest::from_bytes([0x11; DIGEST_LEN]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", "11".repeat(DIGEST_LEN)));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn test_node_position_geometry() {
        let node = NodePosition::new(3, 2);
        assert_eq!(node.leaf_range(), (5, 8));
        assert!(node.contains(5) && node.contains(8));
        assert!(!node.contains(4) && !node.contains(9));
        assert!(!node.is_left());
        assert_eq!(node.sibling(), NodePosition::new(3, 1));
        assert_eq!(node.parent(), NodePosition::new(4, 1));

        let leaf = NodePosition::leaf(7);
        assert_eq!(leaf.leaf_range(), (7, 7));
        assert_eq!(leaf.sibling(), NodePosition::leaf(8));
        assert_eq!(leaf.parent(), NodePosition::new(2, 4));
    }
}
