//! [`Store`]: the coordinator that holds the injected collaborators
//! (Storage, Publisher, Logger, Dispatcher) and drives the commit/load/
//! snapshot protocols.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::{LoggerKind, StoreConfig};
use crate::dispatcher::Dispatcher;
use crate::error::{StorageError, StoreError};
use crate::event::{Event, Payload, Snapshot};
use crate::logger::{Logger, NoopLogger, TracingLogger};
use crate::publisher::{NoopPublisher, Publisher};
use crate::storage::memory::InMemoryStorage;
use crate::storage::{Storage, OPEN_ENDED};
use crate::stream::EventStream;

/// Builder for [`Store`], replacing the source's duck-typed `use(module)` /
/// `configure(fn)` / `start()` sequence with explicit, compile-time-checked
/// role binding.
///
/// A type implementing more than one capability trait can be registered
/// under more than one role by handing the builder an `Arc` of it for each
/// role: `Storage`/`Publisher`/`Logger` all have a blanket impl over
/// `Arc<T>`, so the same handle is accepted wherever its trait is expected.
#[derive(Default)]
pub struct StoreBuilder {
    storage: Option<Arc<dyn Storage>>,
    publisher: Option<Arc<dyn Publisher>>,
    logger: Option<Arc<dyn Logger>>,
    config: StoreConfig,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the storage role.
    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Binds the publisher role.
    pub fn with_publisher(mut self, publisher: impl Publisher + 'static) -> Self {
        self.publisher = Some(Arc::new(publisher));
        self
    }

    /// Binds the logger role.
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Runs a caller-supplied setup block over the current configuration.
    /// Equivalent to the source's `configure(fn)`.
    pub fn configure(mut self, f: impl FnOnce(StoreConfig) -> StoreConfig) -> Self {
        self.config = f(self.config);
        self
    }

    /// Fills any unbound role with a default (in-memory storage, a no-op
    /// publisher, and a console logger if `config.logger` asks for one),
    /// then constructs and starts the [`Dispatcher`].
    pub async fn start(self) -> Result<Store, StorageError> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(InMemoryStorage::new()));

        let publisher = self
            .publisher
            .unwrap_or_else(|| Arc::new(NoopPublisher) as Arc<dyn Publisher>);

        let logger = self.logger.unwrap_or_else(|| match self.config.logger {
            LoggerKind::Console => Arc::new(TracingLogger) as Arc<dyn Logger>,
            LoggerKind::None => Arc::new(NoopLogger) as Arc<dyn Logger>,
        });

        let dispatcher = Dispatcher::start(
            storage.clone(),
            publisher.clone(),
            logger.clone(),
            self.config.publishing_interval,
        )
        .await?;

        Ok(Store {
            storage,
            publisher,
            logger,
            dispatcher,
        })
    }
}

/// The coordinator. Orchestrates commit, snapshot, and stream-load
/// protocols over the injected [`Storage`], and owns the running
/// [`Dispatcher`].
pub struct Store {
    storage: Arc<dyn Storage>,
    #[allow(dead_code)] // kept for symmetry with the role-based builder; publishing goes through the dispatcher
    publisher: Arc<dyn Publisher>,
    logger: Arc<dyn Logger>,
    dispatcher: Dispatcher,
}

impl Store {
    /// Starts a `Store` with an in-memory backend, a no-op publisher, and
    /// the default publishing interval. Equivalent to calling
    /// `StoreBuilder::new().start()`.
    pub async fn in_memory() -> Result<Self, StorageError> {
        StoreBuilder::new().start().await
    }

    /// Loads events from Storage in `[min_rev, max_rev)` (positional) and
    /// wraps them in a fresh [`EventStream`]. `max_rev = OPEN_ENDED` means
    /// open-ended.
    pub async fn get_event_stream(
        &self,
        stream_id: &str,
        min_rev: i64,
        max_rev: i64,
    ) -> Result<EventStream, StoreError> {
        let events = self
            .storage
            .get_events(stream_id, min_rev, max_rev)
            .await
            .map_err(StoreError::BackendFailure)?;

        Ok(EventStream::from_events(stream_id, events))
    }

    /// Two-step load: the latest snapshot with `revision <= max_rev`, then
    /// the events from `snapshot.revision + 1` (or `0` with no snapshot) up
    /// to `max_rev`.
    pub async fn get_from_snapshot(
        &self,
        stream_id: &str,
        max_rev: i64,
    ) -> Result<(Option<Snapshot>, EventStream), StoreError> {
        let snapshot = self
            .storage
            .get_snapshot(stream_id, max_rev)
            .await
            .map_err(StoreError::BackendFailure)?;

        let min_rev = snapshot.as_ref().map(|s| s.revision + 1).unwrap_or(0);
        let stream = self.get_event_stream(stream_id, min_rev, max_rev).await?;

        Ok((snapshot, stream))
    }

    /// Acquires a new id from Storage, assembles the [`Snapshot`], and
    /// persists it.
    pub async fn create_snapshot(
        &self,
        stream_id: &str,
        revision: i64,
        data: Payload,
    ) -> Result<Snapshot, StoreError> {
        let id = self
            .storage
            .get_id()
            .await
            .map_err(StoreError::BackendFailure)?;

        let snapshot = Snapshot {
            id,
            stream_id: stream_id.to_owned(),
            revision,
            data,
        };

        self.storage
            .add_snapshot(snapshot.clone())
            .await
            .map_err(StoreError::BackendFailure)?;

        Ok(snapshot)
    }

    /// The core commit protocol (§4.2.5): assigns a fresh `commit_id` and a
    /// dense run of `stream_revision`s to `stream`'s uncommitted events,
    /// persists them, enqueues them onto the Dispatcher, and moves them
    /// into `stream`'s committed list, all as one logical step from the
    /// caller's point of view.
    ///
    /// An empty uncommitted queue is a no-op success, matching
    /// `Storage::add_events`'s own no-op-on-empty-batch contract.
    ///
    /// Concurrent commits to the same `stream_id` via two independently
    /// loaded `EventStream`s are not detected here; see [`EventStream`]'s
    /// docs.
    pub async fn commit(&self, stream: &mut EventStream) -> Result<(), StoreError> {
        let uncommitted = stream.drain_uncommitted();
        if uncommitted.is_empty() {
            return Ok(());
        }

        let commit_id = self
            .storage
            .get_id()
            .await
            .map_err(StoreError::BackendFailure)?;
        let commit_stamp = Utc::now();
        let mut next_revision = stream.current_revision();

        let sealed: Vec<Event> = uncommitted
            .into_iter()
            .enumerate()
            .map(|(commit_sequence, new_event)| {
                next_revision += 1;
                Event {
                    stream_id: stream.stream_id().to_owned(),
                    stream_revision: next_revision,
                    commit_id: commit_id.clone(),
                    commit_sequence,
                    commit_stamp,
                    header: new_event.header,
                    dispatched: false,
                    payload: new_event.payload,
                }
            })
            .collect();

        self.storage
            .add_events(sealed.clone())
            .await
            .map_err(StoreError::BackendFailure)?;

        self.logger.debug(&format!(
            "committed {} event(s) to stream `{}` (commit_id={commit_id})",
            sealed.len(),
            stream.stream_id(),
        ));

        self.dispatcher.enqueue(sealed.clone()).await;
        stream.extend_committed(sealed);

        Ok(())
    }

    /// Diagnostics-only pass-through to `Storage::get_all_events`.
    pub async fn get_all_events(&self) -> Result<Vec<Event>, StoreError> {
        self.storage
            .get_all_events()
            .await
            .map_err(StoreError::BackendFailure)
    }

    /// Diagnostics-only pass-through to `Storage::get_event_range`.
    pub async fn get_events(&self, index: usize, amount: usize) -> Result<Vec<Event>, StoreError> {
        self.storage
            .get_event_range(index, amount)
            .await
            .map_err(StoreError::BackendFailure)
    }

    /// Stops the Dispatcher's background task, waiting for its current
    /// tick to finish. Any events still queued remain `dispatched=false`
    /// in Storage and will be recovered by the next `Store`'s `start`.
    pub async fn shutdown(mut self) {
        self.dispatcher.stop().await;
    }
}

/// Convenience re-export of the default Dispatcher poll interval, for
/// callers building a [`StoreConfig`] by hand.
pub const DEFAULT_PUBLISHING_INTERVAL: Duration = crate::dispatcher::DEFAULT_PUBLISHING_INTERVAL;
