//! The Dispatcher: a single cooperative worker that reliably drives every
//! committed event to the [`Publisher`] exactly once per successful
//! publish, surviving process restarts via the persisted `dispatched=false`
//! backlog.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::error::StorageError;
use crate::event::Event;
use crate::logger::Logger;
use crate::publisher::Publisher;
use crate::storage::Storage;

/// Default poll interval, matching the spec's documented default.
pub const DEFAULT_PUBLISHING_INTERVAL: Duration = Duration::from_millis(100);

type Queue = Arc<Mutex<VecDeque<Event>>>;

/// A running dispatcher. Dropping this without calling [`Dispatcher::stop`]
/// detaches the background task; it keeps running (and the process keeps
/// dispatching) until the runtime shuts down, but no further `enqueue`
/// calls can be made once the handle is gone.
pub struct Dispatcher {
    queue: Queue,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Performs startup recovery (seeds the queue from
    /// `Storage::get_undispatched_events`) and spawns the polling loop.
    ///
    /// This is what makes commit-then-crash safe: on the next `start`,
    /// persisted `dispatched=false` events are found and re-dispatched in
    /// the order `get_undispatched_events` returns them.
    pub async fn start(
        storage: Arc<dyn Storage>,
        publisher: Arc<dyn Publisher>,
        logger: Arc<dyn Logger>,
        publishing_interval: Duration,
    ) -> Result<Self, StorageError> {
        let backlog = storage.get_undispatched_events().await?;

        if !backlog.is_empty() {
            logger.info(&format!(
                "dispatcher recovered {} undispatched event(s)",
                backlog.len()
            ));
        }

        let queue: Queue = Arc::new(Mutex::new(VecDeque::from(backlog)));
        let (stop_tx, stop_rx) = oneshot::channel();

        let handle = tokio::spawn(run_loop(
            queue.clone(),
            storage,
            publisher,
            logger,
            publishing_interval,
            stop_rx,
        ));

        Ok(Self {
            queue,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Appends a freshly committed batch to the dispatch queue, in commit
    /// order. Best-effort: persistence already happened in `Storage`; if
    /// the process crashes before this batch is drained, the next
    /// `Dispatcher::start` recovers it from `get_undispatched_events`.
    pub async fn enqueue(&self, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }

        self.queue.lock().await.extend(events);
    }

    /// Requests the loop to exit after its current tick and waits for it
    /// to finish. Queued-but-undispatched events remain `dispatched=false`
    /// in storage and are picked up by the next `Dispatcher::start`.
    pub async fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

async fn run_loop(
    queue: Queue,
    storage: Arc<dyn Storage>,
    publisher: Arc<dyn Publisher>,
    logger: Arc<dyn Logger>,
    publishing_interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(publishing_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                dispatch_pending(&queue, &storage, &publisher, &logger).await;
            }
            _ = &mut stop_rx => {
                break;
            }
        }
    }
}

/// One tick's worth of progress: publish events at the head of the queue,
/// in order, stopping at the first failure so ordering is preserved for
/// the next tick.
async fn dispatch_pending(
    queue: &Queue,
    storage: &Arc<dyn Storage>,
    publisher: &Arc<dyn Publisher>,
    logger: &Arc<dyn Logger>,
) {
    loop {
        let event = {
            let guard = queue.lock().await;
            match guard.front() {
                Some(event) => event.clone(),
                None => return,
            }
        };

        match publisher.publish(&event).await {
            Ok(()) => {
                if let Err(err) = storage.set_event_to_dispatched(&event).await {
                    logger.error(&format!(
                        "failed to mark event dispatched (stream_id={}, stream_revision={}): {err}",
                        event.stream_id, event.stream_revision
                    ));
                    return;
                }

                queue.lock().await.pop_front();
            }
            Err(err) => {
                logger.warn(&format!(
                    "publish failed for event (stream_id={}, stream_revision={}), will retry: {err}",
                    event.stream_id, event.stream_revision
                ));
                return;
            }
        }
    }
}
