//! One writer appending while several threads build proofs from the same store

use anyhow::Result;
use blockroot::{hash::sha256, MemoryStore, ProofGenerator, SnapshotStore};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_readers_prove_while_writer_appends() -> Result<()> {
    let store = Arc::new(RwLock::new(MemoryStore::new()));
    {
        let mut writer = store.write();
        for n in 0u64..64 {
            writer.push(sha256(&n.to_le_bytes()));
        }
    }

    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for n in 64u64..2048 {
                store.write().push(sha256(&n.to_le_bytes()));
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4u64)
        .map(|id| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || -> blockroot::Result<u64> {
                let generator = ProofGenerator::new(&*store);
                let mut proved = 0;
                let mut round = 0u64;
                while !done.load(Ordering::SeqCst) || round < 50 {
                    let head = store.read().head().unwrap_or(0);
                    let anchor = 2 + (round * 37 + id * 11) % (head - 1);
                    let from = 1 + (round * 13 + id) % (anchor - 1);

                    let snapshot = store.snapshot(anchor)?;
                    let proof = generator.prove_with_anchor(from, &snapshot)?;
                    assert!(proof.verify_against(&snapshot.merkle));
                    assert_eq!(proof.leaf_digest(), Some(store.digest(from)?));

                    proved += 1;
                    round += 1;
                }
                Ok(proved)
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        let proved = reader.join().expect("reader panicked")?;
        assert!(proved >= 50);
    }

    assert_eq!(store.read().head(), Some(2048));
    Ok(())
}

#[test]
fn test_published_snapshots_never_change() -> Result<()> {
    let mut store = MemoryStore::new();
    for n in 0u64..100 {
        store.push(sha256(&n.to_le_bytes()));
    }
    let before = store.snapshot(60)?;

    for n in 100u64..500 {
        store.push(sha256(&n.to_le_bytes()));
    }

    assert_eq!(store.snapshot(60)?, before);
    Ok(())
}
