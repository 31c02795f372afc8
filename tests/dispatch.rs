//! Scenario tests S4-S6 from the dispatch pipeline's testable properties:
//! ordered delivery, publish-failure retry, and restart recovery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventually_store::{
    EventStream, NoopLogger, PublishError, Publisher, Storage, StoreBuilder, StoreConfig,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingPublisher {
    received: Mutex<Vec<serde_json::Value>>,
    reject_next: AtomicUsize,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, event: &eventually_store::Event) -> Result<(), PublishError> {
        if self.reject_next.load(Ordering::SeqCst) > 0 {
            self.reject_next.fetch_sub(1, Ordering::SeqCst);
            return Err(PublishError::new(anyhow::anyhow!("publisher rejected")));
        }

        self.received.lock().await.push(event.payload.clone());
        Ok(())
    }
}

fn fast_config() -> StoreConfig {
    StoreConfig::default().with_publishing_interval(Duration::from_millis(15))
}

#[tokio::test]
async fn s4_dispatch_delivers_in_commit_order_and_drains_undispatched() {
    let storage = eventually_store::InMemoryStorage::new();
    let publisher = Arc::new(RecordingPublisher::default());

    let store = StoreBuilder::new()
        .with_storage(storage.clone())
        .with_publisher(publisher.clone())
        .configure(|_| fast_config())
        .start()
        .await
        .unwrap();

    let mut stream: EventStream = store.get_event_stream("A", 0, -1).await.unwrap();
    stream
        .add_event(serde_json::json!({"n": 1}))
        .add_event(serde_json::json!({"n": 2}));
    store.commit(&mut stream).await.unwrap();

    // "within at most two publish intervals"
    tokio::time::sleep(Duration::from_millis(60)).await;

    let received = publisher.received.lock().await;
    assert_eq!(*received, vec![serde_json::json!({"n": 1}), serde_json::json!({"n": 2})]);
    drop(received);

    assert!(store.get_all_events().await.unwrap().iter().all(|e| e.dispatched));

    store.shutdown().await;
}

#[tokio::test]
async fn s5_publish_failure_then_recovery() {
    let storage = eventually_store::InMemoryStorage::new();
    let publisher = Arc::new(RecordingPublisher {
        received: Mutex::new(Vec::new()),
        reject_next: AtomicUsize::new(1),
    });

    let store = StoreBuilder::new()
        .with_storage(storage.clone())
        .with_publisher(publisher.clone())
        .configure(|_| fast_config())
        .start()
        .await
        .unwrap();

    let mut stream = store.get_event_stream("A", 0, -1).await.unwrap();
    stream.add_event(serde_json::json!({"n": 1}));
    store.commit(&mut stream).await.unwrap();

    // First tick: publish rejected, event stays undispatched.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.get_all_events().await.unwrap()[0].dispatched, false);

    // Second tick: publish accepted.
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(store.get_all_events().await.unwrap()[0].dispatched);
    assert_eq!(publisher.received.lock().await.len(), 1);

    store.shutdown().await;
}

#[tokio::test]
async fn s6_restart_recovers_undispatched_backlog_in_commit_order() {
    let storage = eventually_store::InMemoryStorage::new();

    // First "process": commit but never let the dispatcher run.
    {
        let store = StoreBuilder::new()
            .with_storage(storage.clone())
            .with_logger(NoopLogger)
            .start()
            .await
            .unwrap();

        let mut stream = store.get_event_stream("A", 0, -1).await.unwrap();
        stream
            .add_event(serde_json::json!({"n": 1}))
            .add_event(serde_json::json!({"n": 2}));
        store.commit(&mut stream).await.unwrap();

        // Shut down immediately: the publisher (NoopPublisher here) never
        // gets a chance to run before we tear the dispatcher down, since
        // we stop before the first tick fires.
        store.shutdown().await;
    }

    assert_eq!(storage.get_undispatched_events().await.unwrap().len(), 2);

    // "Restart": fresh Store, same Storage.
    let publisher = Arc::new(RecordingPublisher::default());
    let store = StoreBuilder::new()
        .with_storage(storage.clone())
        .with_publisher(publisher.clone())
        .configure(|_| fast_config())
        .start()
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    let received = publisher.received.lock().await;
    assert_eq!(*received, vec![serde_json::json!({"n": 1}), serde_json::json!({"n": 2})]);
    drop(received);

    assert!(storage.get_undispatched_events().await.unwrap().is_empty());

    store.shutdown().await;
}
