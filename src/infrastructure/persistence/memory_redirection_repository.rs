//! In-process redirection registry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::Redirection;
use crate::domain::repositories::RedirectionRepository;
use crate::error::AppError;

/// Map-backed registry used when no Redis is configured and in tests.
///
/// Readers run concurrently; `create` and `delete` take the write lock, so the
/// existence check and the mutation form one step.
#[derive(Default)]
pub struct MemoryRedirectionRepository {
    entries: RwLock<HashMap<String, Redirection>>,
}

impl MemoryRedirectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RedirectionRepository for MemoryRedirectionRepository {
    async fn create(&self, redirection: Redirection) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;

        match entries.entry(redirection.key().to_string()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "redirection already exists",
                json!({ "key": redirection.key() }),
            )),
            Entry::Vacant(slot) => {
                slot.insert(redirection);
                Ok(())
            }
        }
    }

    async fn delete(&self, redirection: &Redirection) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .remove(redirection.key())
            .map(|_| ())
            .ok_or_else(|| {
                AppError::not_found(
                    "redirection not found",
                    json!({ "key": redirection.key() }),
                )
            })
    }

    async fn find_by_key(&self, key: &str) -> Result<Redirection, AppError> {
        self.entries
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found("redirection not found", json!({ "key": key })))
    }

    async fn find_all(&self) -> Result<Vec<Redirection>, AppError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
