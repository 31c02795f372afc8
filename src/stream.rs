//! [`EventStream`]: the mutable, per-aggregate working set of committed and
//! uncommitted events a caller loads, mutates, and commits.

use crate::event::{Event, Header, NewEvent, Payload};

/// An in-memory view bound to one stream. Not shared between callers:
/// each load (via [`crate::store::Store::get_event_stream`] or
/// [`crate::store::Store::get_from_snapshot`]) produces a fresh instance.
///
/// Not thread-safe: callers hold exclusive access for the whole
/// load-mutate-commit lifecycle. Concurrent commits to the same stream
/// from two independently loaded `EventStream`s are not detected by this
/// crate and will silently assign overlapping revisions; serializing
/// access to a given `stream_id` (a per-id lock, actor, or similar) is the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct EventStream {
    stream_id: String,
    events: Vec<Event>,
    uncommitted_events: Vec<NewEvent>,
}

impl EventStream {
    /// A fresh, empty stream with no committed history.
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            events: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Wraps an already-loaded slice of committed events.
    pub fn from_events(stream_id: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            stream_id: stream_id.into(),
            events,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Committed events, in stream order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events queued for the next commit, in submission order.
    pub fn uncommitted_events(&self) -> &[NewEvent] {
        &self.uncommitted_events
    }

    /// The max `stream_revision` across committed events, or
    /// [`Event::NO_REVISION`] if none have been committed yet.
    pub fn current_revision(&self) -> i64 {
        self.events
            .last()
            .map(|e| e.stream_revision)
            .unwrap_or(Event::NO_REVISION)
    }

    /// Queues `payload` as a new uncommitted event. Order of addition is
    /// commit order.
    pub fn add_event(&mut self, payload: Payload) -> &mut Self {
        self.uncommitted_events.push(NewEvent::new(payload));
        self
    }

    /// Queues `payload` with an attached `header`.
    pub fn add_event_with_header(&mut self, payload: Payload, header: Header) -> &mut Self {
        self.uncommitted_events
            .push(NewEvent::with_header(payload, header));
        self
    }

    /// Drains the uncommitted queue. Used by [`crate::store::Store::commit`]
    /// to seal events; not part of the public commit protocol itself.
    pub(crate) fn drain_uncommitted(&mut self) -> Vec<NewEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// Appends freshly sealed events to the committed list. Used by
    /// [`crate::store::Store::commit`] after a successful append.
    pub(crate) fn extend_committed(&mut self, events: Vec<Event>) {
        self.events.extend(events);
    }
}
