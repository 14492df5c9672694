//! In-process append-only event log.

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::Event;
use crate::domain::repositories::EventRepository;
use crate::error::AppError;

/// Vector-backed event log used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored events across all keys.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn create(&self, event: Event) -> Result<(), AppError> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn find_by_subject_key(&self, key: &str) -> Result<Vec<Event>, AppError> {
        let matching: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.subject_key() == key)
            .cloned()
            .collect();

        if matching.is_empty() {
            return Err(AppError::not_found(
                "no events found for key",
                json!({ "key": key }),
            ));
        }

        Ok(matching)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
