//! PostgreSQL implementation of the event log.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use crate::domain::entities::{Event, EventType, Redirection};
use crate::domain::repositories::EventRepository;
use crate::error::AppError;

/// PostgreSQL repository for lifecycle events.
///
/// Rows live in `redirection_events` (see `migrations/`). The `id` column
/// preserves append order.
pub struct PgEventRepository {
    pool: Arc<PgPool>,
}

impl PgEventRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    key: String,
    location: String,
    event_type: String,
    occurred_at: String,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type = EventType::from_str(&row.event_type)?;
        let subject = Redirection::new(row.key, row.location)
            .map_err(|e| AppError::internal(format!("stored event is invalid: {e}"), json!({})))?;

        Ok(Event::new(row.occurred_at, event_type, subject))
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, event: Event) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO redirection_events (key, location, event_type, occurred_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.subject().key())
        .bind(event.subject().location())
        .bind(event.event_type().as_str())
        .bind(event.timestamp())
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| AppError::from(e).context("pg event create"))?;

        Ok(())
    }

    async fn find_by_subject_key(&self, key: &str) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT key, location, event_type, occurred_at
            FROM redirection_events
            WHERE key = $1
            ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| AppError::from(e).context("pg event find"))?;

        if rows.is_empty() {
            return Err(AppError::not_found(
                "no events found for key",
                json!({ "key": key }),
            ));
        }

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| AppError::from(e).context("pg ping"))?;
        Ok(())
    }
}
