//! Storage is the abstract, swappable persistence contract the rest of the
//! crate is built on: append-only event log, snapshot store, and id
//! generation. See [`Storage`] for the exact capability set.

pub mod memory;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::event::{Event, Snapshot};

/// Sentinel meaning "to the end of the stream" / "the newest snapshot",
/// used by [`Storage::get_events`] and [`Storage::get_snapshot`].
pub const OPEN_ENDED: i64 = -1;

/// The storage capability role. One object may also implement
/// [`crate::publisher::Publisher`] and/or [`crate::logger::Logger`]; a
/// blanket impl over `Arc<T>` lets a single handle be registered for more
/// than one role on a [`crate::store::StoreBuilder`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Appends an ordered batch to the stream identified by
    /// `events[0].stream_id`. All events in the batch MUST share one
    /// `stream_id`. An empty batch is a no-op success. Append preserves
    /// order.
    async fn add_events(&self, events: Vec<Event>) -> Result<(), StorageError>;

    /// Appends to the per-stream snapshot list.
    async fn add_snapshot(&self, snapshot: Snapshot) -> Result<(), StorageError>;

    /// Returns events with `min_rev <= index < max_rev`, using zero-based
    /// positional indexing over the stream's event log (not
    /// `stream_revision` values, though in normal operation under the
    /// commit protocol they coincide). `max_rev = OPEN_ENDED` means "to
    /// end". An unknown stream returns an empty list.
    async fn get_events(
        &self,
        stream_id: &str,
        min_rev: i64,
        max_rev: i64,
    ) -> Result<Vec<Event>, StorageError>;

    /// Every event across every stream, sorted ascending by `commit_stamp`.
    /// Diagnostics only.
    async fn get_all_events(&self) -> Result<Vec<Event>, StorageError>;

    /// A best-effort slice of length `<= amount` starting at global `index`
    /// across the concatenation of streams, sorted by `commit_stamp`.
    /// Diagnostics only; see the crate-level docs on `getEventRange`'s weak
    /// ordering guarantees.
    async fn get_event_range(&self, index: usize, amount: usize) -> Result<Vec<Event>, StorageError>;

    /// The latest snapshot for `stream_id` with `revision <= max_rev`, or
    /// the newest snapshot if `max_rev = OPEN_ENDED`. `None` if no
    /// qualifying snapshot exists.
    async fn get_snapshot(
        &self,
        stream_id: &str,
        max_rev: i64,
    ) -> Result<Option<Snapshot>, StorageError>;

    /// All events with `dispatched = false`, in any order the backend
    /// chooses but stable within a call.
    async fn get_undispatched_events(&self) -> Result<Vec<Event>, StorageError>;

    /// Marks `event` dispatched. The transition must be visible to
    /// subsequent `get_undispatched_events` calls.
    async fn set_event_to_dispatched(&self, event: &Event) -> Result<(), StorageError>;

    /// Returns a fresh, globally unique identifier.
    async fn get_id(&self) -> Result<String, StorageError>;
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for std::sync::Arc<T> {
    #[inline]
    async fn add_events(&self, events: Vec<Event>) -> Result<(), StorageError> {
        (**self).add_events(events).await
    }

    #[inline]
    async fn add_snapshot(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        (**self).add_snapshot(snapshot).await
    }

    #[inline]
    async fn get_events(
        &self,
        stream_id: &str,
        min_rev: i64,
        max_rev: i64,
    ) -> Result<Vec<Event>, StorageError> {
        (**self).get_events(stream_id, min_rev, max_rev).await
    }

    #[inline]
    async fn get_all_events(&self) -> Result<Vec<Event>, StorageError> {
        (**self).get_all_events().await
    }

    #[inline]
    async fn get_event_range(&self, index: usize, amount: usize) -> Result<Vec<Event>, StorageError> {
        (**self).get_event_range(index, amount).await
    }

    #[inline]
    async fn get_snapshot(
        &self,
        stream_id: &str,
        max_rev: i64,
    ) -> Result<Option<Snapshot>, StorageError> {
        (**self).get_snapshot(stream_id, max_rev).await
    }

    #[inline]
    async fn get_undispatched_events(&self) -> Result<Vec<Event>, StorageError> {
        (**self).get_undispatched_events().await
    }

    #[inline]
    async fn set_event_to_dispatched(&self, event: &Event) -> Result<(), StorageError> {
        (**self).set_event_to_dispatched(event).await
    }

    #[inline]
    async fn get_id(&self) -> Result<String, StorageError> {
        (**self).get_id().await
    }
}
