//! Proof generation and verification tests

use anyhow::Result;
use blockroot::{
    hash::sha256,
    proofs::{verify_path, ProofPosition},
    Digest, IncrementalMerkle, MemoryStore, Proof, ProofGenerator, SnapshotStore,
};
use rstest::rstest;

fn chain(count: u64) -> MemoryStore {
    (1..=count).map(|n| sha256(&n.to_le_bytes())).collect()
}

fn based_chain(base_count: u64, length: u64) -> Result<MemoryStore> {
    let base = IncrementalMerkle::from_parts(base_count, vec![sha256(b"synthetic base")])?;
    let mut store = MemoryStore::from_base(base);
    for n in 0..length {
        store.push(sha256(&n.to_le_bytes()));
    }
    Ok(store)
}

#[test]
fn test_every_pair_on_a_chain_verifies() -> Result<()> {
    let store = chain(70);
    let generator = ProofGenerator::new(&store);

    for anchor in 2..=70 {
        let snapshot = store.snapshot(anchor)?;
        for from in 1..anchor {
            let proof = generator.prove(from, anchor)?;
            assert!(proof.verify(), "from {} anchor {}", from, anchor);
            assert!(proof.verify_against(&snapshot.merkle));
            assert_eq!(proof.leaf_digest(), Some(store.digest(from)?));
            assert_eq!((proof.from, proof.anchor), (from, anchor));
        }
    }
    Ok(())
}

#[test]
fn test_proofs_over_a_synthetic_base() -> Result<()> {
    let store = based_chain(16384, 600)?;
    let generator = ProofGenerator::new(&store);
    let first = store.first();
    assert_eq!(first, 16385);

    for anchor in (first + 200..first + 600).step_by(13) {
        let snapshot = store.snapshot(anchor)?;
        for from in first + 100..anchor {
            let proof = generator.prove(from, anchor)?;
            assert!(proof.verify_against(&snapshot.merkle), "from {} anchor {}", from, anchor);
        }
    }
    Ok(())
}

#[test]
fn test_proof_outlives_later_appends() -> Result<()> {
    let mut store = chain(37);
    let proof = ProofGenerator::new(&store).prove(5, 37)?;
    let sealed = proof.sealed_root().unwrap();

    store.extend((100u64..400).map(|n| sha256(&n.to_le_bytes())));

    // the sealed subtree is still a node of the full tree
    let leaves: Vec<Digest> = store.iter().map(|snapshot| snapshot.digest).collect();
    let tree = blockroot::MerkleTree::from_leaves(&leaves);
    assert!(tree.levels().iter().any(|level| level.contains(&sealed)));
    assert!(proof.verify());
    Ok(())
}

#[test]
fn test_tamper_sensitivity() -> Result<()> {
    let store = chain(40);
    let generator = ProofGenerator::new(&store);

    for (from, anchor) in [(3, 37), (18, 40), (1, 33), (30, 39)] {
        let proof = generator.prove(from, anchor)?;
        assert!(proof.len() > 3);

        for i in 0..proof.len() {
            for byte in 0..32 {
                for bit in 0..8 {
                    let mut tampered = proof.clone();
                    let mut bytes = *tampered.elements[i].digest.as_bytes();
                    bytes[byte] ^= 1 << bit;
                    tampered.elements[i].digest = Digest::from_bytes(bytes);
                    assert!(
                        !tampered.verify(),
                        "element {} byte {} bit {}",
                        i,
                        byte,
                        bit
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_top_bit_of_each_element_is_committed() -> Result<()> {
    let store = chain(40);
    let proof = ProofGenerator::new(&store).prove(3, 37)?;
    assert_eq!(proof.len(), 7);

    for i in 0..proof.len() {
        let mut tampered = proof.clone();
        let mut bytes = *tampered.elements[i].digest.as_bytes();
        bytes[0] ^= 0x80;
        tampered.elements[i].digest = Digest::from_bytes(bytes);

        assert!(!tampered.verify(), "element {}", i);
        if i == 0 {
            assert_ne!(tampered.leaf_digest(), proof.leaf_digest());
        }
    }
    Ok(())
}

#[test]
fn test_orientation_tags_are_checked() -> Result<()> {
    let store = chain(40);
    let proof = ProofGenerator::new(&store).prove(3, 37)?;

    for i in 2..proof.len() - 1 {
        let mut flipped = proof.clone();
        flipped.elements[i].position = match flipped.elements[i].position {
            ProofPosition::Left => ProofPosition::Right,
            ProofPosition::Right => ProofPosition::Left,
            ProofPosition::Untagged => unreachable!("intermediates are tagged"),
        };
        assert!(!flipped.verify());
    }
    Ok(())
}

#[test]
fn test_single_item_anchor() -> Result<()> {
    let store = chain(5);
    let proof = ProofGenerator::new(&store).prove(1, 2)?;

    assert_eq!(proof.len(), 1);
    assert_eq!(proof.elements[0].position, ProofPosition::Untagged);
    assert!(proof.verify());
    assert!(proof.verify_against(&store.snapshot(2)?.merkle));
    Ok(())
}

#[rstest]
#[case(5, 5)]
#[case(6, 5)]
#[case(0, 3)]
#[case(10, 1)]
fn test_invalid_order_is_rejected(#[case] from: u64, #[case] anchor: u64) {
    let store = chain(10);
    let err = ProofGenerator::new(&store).prove(from, anchor).unwrap_err();
    assert!(err.is_invalid_input(), "{}", err);
}

#[test]
fn test_unknown_items_are_out_of_range() -> Result<()> {
    let store = chain(10);
    assert!(ProofGenerator::new(&store)
        .prove(3, 11)
        .unwrap_err()
        .is_out_of_range());

    // proving inside the base needs snapshots the store never had
    let store = based_chain(64, 40)?;
    assert!(ProofGenerator::new(&store)
        .prove(10, 100)
        .unwrap_err()
        .is_out_of_range());
    Ok(())
}

#[test]
fn test_mismatched_store_is_internal_consistency() {
    struct Shifted(MemoryStore);

    impl SnapshotStore for Shifted {
        fn snapshot(&self, number: u64) -> blockroot::Result<blockroot::Snapshot> {
            self.0.snapshot(number + 1)
        }
    }

    let store = Shifted(chain(20));
    let err = ProofGenerator::new(&store).prove(3, 15).unwrap_err();
    assert!(err.is_internal_consistency());
}

#[test]
fn test_proof_json_roundtrip() -> Result<()> {
    let store = chain(40);
    let proof = ProofGenerator::new(&store).prove(18, 40)?;

    let json = proof.to_json()?;
    let parsed = Proof::from_json(&json)?;
    assert_eq!(parsed, proof);
    assert!(verify_path(&parsed.elements));
    Ok(())
}
