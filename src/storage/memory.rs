//! Reference in-memory [`Storage`] backend.
//!
//! Keeps a per-stream `Vec<Event>` and a per-stream `Vec<Snapshot>` behind a
//! single `RwLock`, in the same shape as the nested maps in the reference
//! implementation this crate was modeled on. No cross-stream index is kept;
//! `get_all_events` and `get_event_range` scan and sort on every call.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::event::{Event, Snapshot};
use crate::storage::{Storage, OPEN_ENDED};

#[derive(Debug, Default)]
struct InMemoryData {
    streams: HashMap<String, Vec<Event>>,
    snapshots: HashMap<String, Vec<Snapshot>>,
}

/// Non-durable [`Storage`] implementation. Used as the default backend
/// when a [`crate::store::StoreBuilder`] is started without one bound, and
/// as the reference backend for the crate's own tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<RwLock<InMemoryData>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn add_events(&self, events: Vec<Event>) -> Result<(), StorageError> {
        let Some(first) = events.first() else {
            return Ok(());
        };

        debug_assert!(
            events.iter().all(|e| e.stream_id == first.stream_id),
            "a commit batch must target a single stream"
        );

        let mut inner = self.inner.write().expect("in-memory storage lock poisoned");
        inner
            .streams
            .entry(first.stream_id.clone())
            .or_default()
            .extend(events);

        Ok(())
    }

    async fn add_snapshot(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("in-memory storage lock poisoned");
        inner
            .snapshots
            .entry(snapshot.stream_id.clone())
            .or_default()
            .push(snapshot);

        Ok(())
    }

    async fn get_events(
        &self,
        stream_id: &str,
        min_rev: i64,
        max_rev: i64,
    ) -> Result<Vec<Event>, StorageError> {
        let inner = self.inner.read().expect("in-memory storage lock poisoned");
        let Some(events) = inner.streams.get(stream_id) else {
            return Ok(Vec::new());
        };

        let start = min_rev.max(0) as usize;
        let end = if max_rev == OPEN_ENDED {
            events.len()
        } else {
            (max_rev.max(0) as usize).min(events.len())
        };

        if start >= end {
            return Ok(Vec::new());
        }

        Ok(events[start..end].to_vec())
    }

    async fn get_all_events(&self) -> Result<Vec<Event>, StorageError> {
        let inner = self.inner.read().expect("in-memory storage lock poisoned");
        let mut all: Vec<Event> = inner.streams.values().flatten().cloned().collect();
        all.sort_by_key(|e| e.commit_stamp);

        Ok(all)
    }

    async fn get_event_range(&self, index: usize, amount: usize) -> Result<Vec<Event>, StorageError> {
        // Best-effort diagnostics only: `HashMap` stream iteration order is
        // unspecified, so the window's cross-stream interleaving is
        // backend-dependent. The result is always sorted by `commit_stamp`
        // and its length is deterministic.
        let inner = self.inner.read().expect("in-memory storage lock poisoned");
        let mut all: Vec<Event> = inner.streams.values().flatten().cloned().collect();
        all.sort_by_key(|e| e.commit_stamp);

        let start = index.min(all.len());
        let end = (index + amount).min(all.len());

        Ok(all[start..end].to_vec())
    }

    async fn get_snapshot(
        &self,
        stream_id: &str,
        max_rev: i64,
    ) -> Result<Option<Snapshot>, StorageError> {
        let inner = self.inner.read().expect("in-memory storage lock poisoned");
        let Some(snapshots) = inner.snapshots.get(stream_id) else {
            return Ok(None);
        };

        if max_rev == OPEN_ENDED {
            return Ok(snapshots.last().cloned());
        }

        Ok(snapshots
            .iter()
            .rev()
            .find(|s| s.revision <= max_rev)
            .cloned())
    }

    async fn get_undispatched_events(&self) -> Result<Vec<Event>, StorageError> {
        let inner = self.inner.read().expect("in-memory storage lock poisoned");
        let mut undispatched: Vec<Event> = inner
            .streams
            .values()
            .flatten()
            .filter(|e| !e.dispatched)
            .cloned()
            .collect();

        // Cross-stream `HashMap` iteration order is unspecified; sorting by
        // (commit_stamp, commit_sequence) keeps per-commit order intact and
        // gives a deterministic, stable result within a call.
        undispatched.sort_by_key(|e| (e.commit_stamp, e.commit_sequence));

        Ok(undispatched)
    }

    async fn set_event_to_dispatched(&self, event: &Event) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("in-memory storage lock poisoned");
        if let Some(stream) = inner.streams.get_mut(&event.stream_id) {
            if let Some(stored) = stream
                .iter_mut()
                .find(|e| e.stream_revision == event.stream_revision)
            {
                stored.mark_dispatched();
            }
        }

        Ok(())
    }

    async fn get_id(&self) -> Result<String, StorageError> {
        Ok(uuid::Uuid::new_v4().to_string())
    }
}
