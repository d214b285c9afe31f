//! Hash utilities and canonical pairing
//!
//! Interior nodes are derived as `sha256(LEFT_TAG || left || RIGHT_TAG || right)`.
//! Each operand keeps all 32 of its bytes and is preceded by a tag byte naming
//! its side, so a verifier can reproduce the hashing order from a left/right
//! tag alone and any change to either operand changes the parent.

use crate::core::types::{Digest, DIGEST_LEN};
use sha2::{Digest as _, Sha256};

/// Tag byte preceding the left operand
pub const LEFT_TAG: u8 = 0x00;

/// Tag byte preceding the right operand
pub const RIGHT_TAG: u8 = 0x01;

/// Length of the encoded pair fed to the hash function
pub const PAIR_LEN: usize = 2 * (DIGEST_LEN + 1);

/// Compute SHA-256 digest of data
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Digest::from_bytes(hasher.finalize().into())
}

/// Compute SHA-256 digest of a string
pub fn hash_string(s: &str) -> Digest {
    sha256(s.as_bytes())
}

/// Ordered pair of child digests, ready to be hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalPair {
    left: Digest,
    right: Digest,
}

impl CanonicalPair {
    pub fn left(&self) -> &Digest {
        &self.left
    }

    pub fn right(&self) -> &Digest {
        &self.right
    }

    /// The exact bytes fed to the hash function
    pub fn to_bytes(&self) -> [u8; PAIR_LEN] {
        let mut bytes = [0u8; PAIR_LEN];
        bytes[0] = LEFT_TAG;
        bytes[1..=DIGEST_LEN].copy_from_slice(self.left.as_bytes());
        bytes[DIGEST_LEN + 1] = RIGHT_TAG;
        bytes[DIGEST_LEN + 2..].copy_from_slice(self.right.as_bytes());
        bytes
    }

    pub fn hash(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update([LEFT_TAG]);
        hasher.update(self.left.as_bytes());
        hasher.update([RIGHT_TAG]);
        hasher.update(self.right.as_bytes());
        Digest::from_bytes(hasher.finalize().into())
    }
}

pub fn canonical_pair(left: &Digest, right: &Digest) -> CanonicalPair {
    CanonicalPair {
        left: *left,
        right: *right,
    }
}

/// Combine two child digests into their parent
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    canonical_pair(left, right).hash()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let data = b"Hello, Blockroot!";
        let digest = sha256(data);

        assert_ne!(digest, Digest::zero());
        assert_eq!(digest, sha256(data));
        assert_eq!(hash_string("Hello, Blockroot!"), digest);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_canonical_pair_layout() {
        let a = Digest::from_bytes([0x80; DIGEST_LEN]);
        let b = Digest::from_bytes([0x01; DIGEST_LEN]);
        let pair = canonical_pair(&a, &b);
        let bytes = pair.to_bytes();

        assert_eq!(bytes.len(), PAIR_LEN);
        assert_eq!(bytes[0], LEFT_TAG);
        assert_eq!(&bytes[1..=DIGEST_LEN], a.as_bytes());
        assert_eq!(bytes[DIGEST_LEN + 1], RIGHT_TAG);
        assert_eq!(&bytes[DIGEST_LEN + 2..], b.as_bytes());
        assert_eq!(pair.hash(), sha256(&bytes));
        assert_eq!((pair.left(), pair.right()), (&a, &b));
    }

    #[test]
    fn test_hash_pair_is_ordered() {
        let first = sha256(b"first");
        let second = sha256(b"second");
        let combined = hash_pair(&first, &second);

        assert_ne!(combined, first);
        assert_ne!(combined, second);
        assert_eq!(combined, hash_pair(&first, &second));
        assert_ne!(combined, hash_pair(&second, &first));
    }

    #[test]
    fn test_every_operand_bit_reaches_the_parent() {
        let first = sha256(b"first");
        let second = sha256(b"second");
        let parent = hash_pair(&first, &second);

        for byte in 0..DIGEST_LEN {
            for bit in 0..8 {
                let mut flipped = *first.as_bytes();
                flipped[byte] ^= 1 << bit;
                let flipped = Digest::from_bytes(flipped);

                assert_ne!(hash_pair(&flipped, &second), parent, "left byte {} bit {}", byte, bit);
                assert_ne!(hash_pair(&second, &flipped), hash_pair(&second, &first));
            }
        }
    }
}
