//! Property-based checks for invariants 1, 2, and 5 from the spec's
//! testable-properties section: revision monotonicity across commits,
//! dense commit-sequence/shared commit identity within a commit, and
//! payload round-tripping.

use proptest::prelude::*;
use tokio::runtime::Runtime;

use eventually_store::Store;

fn payload(n: u32) -> serde_json::Value {
    serde_json::json!({"n": n})
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariant 1: for any sequence of commit batch sizes on one stream,
    /// every event of a later commit has a strictly greater stream_revision
    /// than every event of an earlier commit.
    #[test]
    fn revisions_strictly_increase_across_commits(batch_sizes in prop::collection::vec(1usize..5, 1..8)) {
        let rt = Runtime::new().unwrap();

        rt.block_on(async {
            let store = Store::in_memory().await.unwrap();
            let mut stream = store.get_event_stream("A", 0, -1).await.unwrap();
            let mut max_seen_so_far: i64 = -1;
            let mut next_payload = 0u32;

            for size in batch_sizes {
                let before = stream.events().len();

                for _ in 0..size {
                    stream.add_event(payload(next_payload));
                    next_payload += 1;
                }

                store.commit(&mut stream).await.unwrap();

                let committed_this_batch = &stream.events()[before..];
                for event in committed_this_batch {
                    prop_assert!(event.stream_revision > max_seen_so_far);
                    max_seen_so_far = event.stream_revision;
                }
            }

            Ok(())
        })?;
    }

    /// Invariant 2: within one commit, commit_sequence is dense 0..n-1 in
    /// submission order, and every event shares one commit_id and one
    /// commit_stamp.
    #[test]
    fn single_commit_has_dense_sequence_and_shared_identity(batch_size in 1usize..8) {
        let rt = Runtime::new().unwrap();

        rt.block_on(async {
            let store = Store::in_memory().await.unwrap();
            let mut stream = store.get_event_stream("A", 0, -1).await.unwrap();

            for n in 0..batch_size {
                stream.add_event(payload(n as u32));
            }

            store.commit(&mut stream).await.unwrap();

            let events = stream.events();
            prop_assert_eq!(events.len(), batch_size);

            let commit_id = &events[0].commit_id;
            let commit_stamp = events[0].commit_stamp;

            for (i, event) in events.iter().enumerate() {
                prop_assert_eq!(event.commit_sequence, i);
                prop_assert_eq!(&event.commit_id, commit_id);
                prop_assert_eq!(event.commit_stamp, commit_stamp);
                prop_assert!(!event.dispatched);
            }

            Ok(())
        })?;
    }

    /// Invariant 5: a single committed payload round-trips unchanged
    /// through get_event_stream.
    #[test]
    fn payload_round_trips_through_commit_and_reload(n in any::<u32>()) {
        let rt = Runtime::new().unwrap();

        rt.block_on(async {
            let store = Store::in_memory().await.unwrap();
            let mut stream = store.get_event_stream("A", 0, -1).await.unwrap();
            let p = payload(n);
            stream.add_event(p.clone());
            store.commit(&mut stream).await.unwrap();

            let reloaded = store.get_event_stream("A", 0, -1).await.unwrap();
            prop_assert_eq!(reloaded.events().len(), 1);
            prop_assert_eq!(&reloaded.events()[0].payload, &p);

            Ok(())
        })?;
    }
}
