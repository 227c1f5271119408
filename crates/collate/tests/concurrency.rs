//! Per-key linearizability under concurrent writers.

use std::sync::Arc;

use collate::store::{MemoryStore, PutResult, Store};
use collate::Collate;
use collate_testkit::fixtures::{contend, key, SqliteFixture};
use collate_testkit::Claim;

fn single_winner(claims: &[Claim]) -> &Claim {
    let winners: Vec<_> = claims
        .iter()
        .filter(|c| c.result == PutResult::Created)
        .collect();
    assert_eq!(winners.len(), 1, "exactly one writer must claim the key");

    for claim in claims {
        assert_ne!(
            claim.result,
            PutResult::Updated,
            "writer {} updated a key it did not claim",
            claim.writer
        );
    }
    winners[0]
}

async fn assert_stored<S: Store>(store: &S, name: &str, winner: &Claim) {
    let record = store.get_record(&key(name)).await.unwrap().unwrap();
    assert_eq!(record.value, winner.value);
    assert_eq!(record.credential, winner.credential);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_claims_memory() {
    let store = Arc::new(MemoryStore::new());

    for round in 0..20 {
        let name = format!("contested-{}", round);
        let claims = contend(Arc::clone(&store), &key(&name), 16).await.unwrap();
        let winner = single_winner(&claims);
        assert_stored(&store, &name, winner).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_claims_sqlite() {
    let fixture = SqliteFixture::new();
    let path = fixture.path();
    let store = Arc::new(fixture.store);

    for round in 0..10 {
        let name = format!("contested-{}", round);
        let claims = contend(Arc::clone(&store), &key(&name), 16).await.unwrap();
        let winner = single_winner(&claims);
        assert_stored(&store, &name, winner).await;
    }

    // The winners are what a fresh handle sees on disk.
    let reopened = collate::store::SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.count().await.unwrap(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_owner_and_intruders_interleaved() {
    let collate = Arc::new(Collate::new(MemoryStore::new()));
    collate.put("alpha", "v0", "owner").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..32 {
        let collate = Arc::clone(&collate);
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                collate
                    .put("alpha", &format!("v{}", i), "owner")
                    .await
                    .is_ok()
            } else {
                collate
                    .put("alpha", "intruder", &format!("t{}", i))
                    .await
                    .is_ok()
            }
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 16);
    let value = collate.get("alpha").await.unwrap();
    assert_ne!(value, "intruder");
    assert!(value.starts_with('v'));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_different_keys_do_not_interfere() {
    let store = Arc::new(MemoryStore::new());

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            contend(store, &key(&format!("k{}", i)), 4).await.unwrap()
        }));
    }

    for handle in handles {
        single_winner(&handle.await.unwrap());
    }
    assert_eq!(store.count().await.unwrap(), 16);
}
