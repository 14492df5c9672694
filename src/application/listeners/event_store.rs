//! Listener that persists events into the event log.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::Event;
use crate::domain::listener::Listener;
use crate::domain::repositories::EventRepository;
use crate::error::AppError;

/// Appends every consumed event to an [`EventRepository`].
///
/// Visit counts are derived from what this listener stores, so counts become
/// visible only after the dispatcher delivered the `read` event.
pub struct EventStore<E: EventRepository + ?Sized> {
    repository: Arc<E>,
}

impl<E: EventRepository + ?Sized> EventStore<E> {
    pub fn new(repository: Arc<E>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<E: EventRepository + ?Sized + 'static> Listener for EventStore<E> {
    fn name(&self) -> &'static str {
        "event_store"
    }

    async fn consume(&self, event: &Event) -> Result<(), AppError> {
        self.repository
            .create(event.clone())
            .await
            .map_err(|e| e.context("event_store.consume"))?;

        debug!(key = event.subject_key(), event_type = %event.event_type(), "Event stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EventType, Redirection};
    use crate::domain::repositories::MockEventRepository;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn read_event() -> Event {
        Event::read(Redirection::new("abc123", "https://example.com").unwrap())
    }

    #[tokio::test]
    async fn test_consume_appends_event() {
        let mut mock_repo = MockEventRepository::new();

        mock_repo
            .expect_create()
            .withf(|e| e.subject_key() == "abc123" && e.event_type() == EventType::Read)
            .times(1)
            .returning(|_| Ok(()));

        let store = EventStore::new(Arc::new(mock_repo));
        assert!(store.consume(&read_event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_consume_propagates_backend_error() {
        let mut mock_repo = MockEventRepository::new();

        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("connection reset", json!({}))));

        let store = EventStore::new(Arc::new(mock_repo));
        let err = store.consume(&read_event()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("event_store.consume: "));
    }
}
