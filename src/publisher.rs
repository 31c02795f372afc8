//! The publisher capability role: the sink downstream subscribers are fed
//! through. The core never constructs a real publisher; only the two
//! reference implementations below (used for defaults and tests) live here.

use async_trait::async_trait;

use crate::error::PublishError;
use crate::event::Event;

/// A sink that accepts committed events. Implementations must be
/// idempotent per `(commit_id, commit_sequence)`, since the
/// [`crate::dispatcher::Dispatcher`] re-publishes an event if a crash
/// happens between a successful `publish` and the matching
/// `set_event_to_dispatched`.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<(), PublishError>;
}

#[async_trait]
impl<T: Publisher + ?Sized> Publisher for std::sync::Arc<T> {
    #[inline]
    async fn publish(&self, event: &Event) -> Result<(), PublishError> {
        (**self).publish(event).await
    }
}

/// Discards every event, successfully. Bound by [`crate::store::StoreBuilder::start`]
/// when no publisher role has been filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl Publisher for NoopPublisher {
    #[inline]
    async fn publish(&self, _event: &Event) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_event() -> Event {
        Event {
            stream_id: "A".into(),
            stream_revision: 0,
            commit_id: "c1".into(),
            commit_sequence: 0,
            commit_stamp: Utc::now(),
            header: None,
            dispatched: false,
            payload: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn noop_publisher_always_succeeds() {
        assert!(NoopPublisher.publish(&sample_event()).await.is_ok());
    }
}
