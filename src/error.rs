//! Error taxonomy for the store.
//!
//! `StorageError` is backend-local and carries the backend's own failure
//! reason as an opaque [`anyhow::Error`]. `StoreError` is what callers of
//! [`crate::store::Store`] actually see; a `StorageError` converts into it
//! via `#[from]`. `PublishError` never crosses the `Store`'s public API:
//! only the [`crate::dispatcher::Dispatcher`] observes and retries it.

use thiserror::Error;

/// Failure returned by a [`crate::storage::Storage`] implementation.
#[derive(Debug, Error)]
#[error("storage backend failed: {0}")]
pub struct StorageError(#[source] pub anyhow::Error);

impl StorageError {
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self(source.into())
    }
}

/// Failure returned by a [`crate::publisher::Publisher`] implementation.
#[derive(Debug, Error)]
#[error("publisher rejected event: {0}")]
pub struct PublishError(#[source] pub anyhow::Error);

impl PublishError {
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self(source.into())
    }
}

/// Failure surfaced to callers of [`crate::store::Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation was attempted before `Storage` was bound to the store.
    ///
    /// Structurally unreachable once a `Store` has been produced by
    /// `StoreBuilder::start`, since `start` always fills the storage role
    /// with a default; kept as a variant to mirror the source's own
    /// synchronous guard and to leave room for a lower-level constructor
    /// that skips the defaulting.
    #[error("store operation attempted without a configured storage backend")]
    ConfigurationMissing,

    /// The underlying storage backend failed.
    #[error(transparent)]
    BackendFailure(#[from] StorageError),
}
