//! Property tests for the ownership contract, run against both backends.

use std::future::Future;
use std::sync::Arc;

use proptest::prelude::*;

use collate::store::{MemoryStore, SqliteStore, Store};
use collate::{Collate, CollateError, ErrorKind, PutOutcome};
use collate_testkit::generators::{distinct_token_pair, key, value, WriteParams};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn backends() -> Vec<(&'static str, Collate<Arc<dyn Store>>)> {
    let memory: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let sqlite: Arc<dyn Store> = Arc::new(SqliteStore::open_memory().unwrap());
    vec![("memory", Collate::new(memory)), ("sqlite", Collate::new(sqlite))]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // P1: the first write to an unused key succeeds and is readable.
    #[test]
    fn first_write_claims_ownership(params in any::<WriteParams>()) {
        block_on(async {
            for (name, collate) in backends() {
                let outcome = collate.put_request(&collate::WriteRequest {
                    key: params.key.clone(),
                    value: params.value.clone(),
                    credential: params.credential.clone(),
                }).await.unwrap();
                assert_eq!(outcome, PutOutcome::Created, "{}", name);
                assert_eq!(collate.get(params.key.as_str()).await.unwrap(), params.value, "{}", name);
            }
        });
    }

    // P2 and P5: the owner can overwrite, repeatedly, with the same result.
    #[test]
    fn authorized_overwrite_is_idempotent(params in any::<WriteParams>(), v2 in value()) {
        block_on(async {
            for (name, collate) in backends() {
                let k = params.key.as_str();
                let t = params.credential.as_str();
                collate.put(k, &params.value, t).await.unwrap();

                assert_eq!(collate.put(k, &v2, t).await.unwrap(), PutOutcome::Updated, "{}", name);
                assert_eq!(collate.put(k, &v2, t).await.unwrap(), PutOutcome::Updated, "{}", name);
                assert_eq!(collate.get(k).await.unwrap(), v2, "{}", name);
            }
        });
    }

    // P3: a write with another token is denied and changes nothing.
    #[test]
    fn denied_overwrite_leaves_state_unchanged(
        k in key(),
        v1 in value(),
        v3 in value(),
        (owner, intruder) in distinct_token_pair(),
    ) {
        block_on(async {
            for (name, collate) in backends() {
                collate.put(k.as_str(), &v1, owner.as_str()).await.unwrap();

                let err = collate.put(k.as_str(), &v3, intruder.as_str()).await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::AccessDenied, "{}", name);

                let record = collate.store().get_record(&k).await.unwrap().unwrap();
                assert_eq!(record.value, v1, "{}", name);
                assert_eq!(record.credential, owner, "{}", name);
            }
        });
    }

    // P4: a key nobody wrote reads as not found.
    #[test]
    fn absent_key_is_not_found(written in any::<WriteParams>(), missing in key()) {
        prop_assume!(written.key != missing);
        block_on(async {
            for (name, collate) in backends() {
                collate.put_request(&collate::WriteRequest {
                    key: written.key.clone(),
                    value: written.value.clone(),
                    credential: written.credential.clone(),
                }).await.unwrap();

                let err = collate.get(missing.as_str()).await.unwrap_err();
                assert!(matches!(err, CollateError::NotFound(ref k) if k == missing.as_str()), "{}", name);
            }
        });
    }
}
