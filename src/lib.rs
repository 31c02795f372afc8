//! An append-only persistence engine for domain events organized into
//! per-aggregate streams, with snapshot support and a reliable background
//! dispatch pipeline that publishes committed events to downstream
//! subscribers exactly when their persistence has been durably
//! acknowledged.
//!
//! The three load-bearing pieces are [`storage`] (the swappable backend
//! contract), [`store`] (the coordinator that assigns commit identity and
//! revisions), and [`dispatcher`] (the producer/consumer loop that
//! publishes committed-but-undispatched events and survives restarts).
//!
//! This crate does not interpret event payloads, enforce schemas, provide
//! projections or read models, implement cross-stream transactions, or
//! define a query language. Payloads are opaque `serde_json::Value`s.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod logger;
pub mod publisher;
pub mod storage;
pub mod store;
pub mod stream;

pub use config::{LoggerKind, StoreConfig};
pub use error::{PublishError, StorageError, StoreError};
pub use event::{Event, Header, NewEvent, Payload, Snapshot};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use publisher::{NoopPublisher, Publisher};
pub use storage::memory::InMemoryStorage;
pub use storage::Storage;
pub use store::{Store, StoreBuilder};
pub use stream::EventStream;
