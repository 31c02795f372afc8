//! Event and Snapshot data model.
//!
//! An [`Event`] is sealed with its identity fields (`stream_revision`,
//! `commit_id`, `commit_sequence`, `commit_stamp`) only once it has gone
//! through [`crate::store::Store::commit`]. Before that, a caller only ever
//! holds a [`NewEvent`], which carries nothing but the opaque payload and an
//! optional header.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque domain payload. The core never interprets this value.
pub type Payload = serde_json::Value;

/// Opaque metadata attached to an event or carried alongside a payload.
pub type Header = serde_json::Value;

/// A payload waiting to be sealed into a committed [`Event`].
///
/// Produced by [`crate::stream::EventStream::add_event`]; consumed in
/// submission order by [`crate::store::Store::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub payload: Payload,
    pub header: Option<Header>,
}

impl NewEvent {
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            header: None,
        }
    }

    pub fn with_header(payload: Payload, header: Header) -> Self {
        Self {
            payload,
            header: Some(header),
        }
    }
}

impl From<Payload> for NewEvent {
    #[inline]
    fn from(payload: Payload) -> Self {
        Self::new(payload)
    }
}

/// A persisted, committed event.
///
/// All events committed together share `commit_id` and `commit_stamp`;
/// `commit_sequence` is their dense, 0-based position within that commit.
/// `stream_revision` is the event's dense, 0-based position within its
/// stream, strictly increasing across commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub stream_id: String,
    pub stream_revision: i64,
    pub commit_id: String,
    pub commit_sequence: usize,
    pub commit_stamp: DateTime<Utc>,
    pub header: Option<Header>,
    pub dispatched: bool,
    pub payload: Payload,
}

impl Event {
    /// Sentinel revision for a stream with no committed events yet.
    pub const NO_REVISION: i64 = -1;

    /// Marks this event as dispatched. Used by in-process backends and
    /// tests; real backends go through [`crate::storage::Storage::set_event_to_dispatched`].
    pub(crate) fn mark_dispatched(&mut self) {
        self.dispatched = true;
    }
}

/// A captured, opaque snapshot of a stream's state at a given revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub stream_id: String,
    pub revision: i64,
    pub data: Payload,
}
