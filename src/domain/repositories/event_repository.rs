//! Repository trait for the append-only event log.

use crate::domain::entities::Event;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for lifecycle events.
///
/// Events are never updated or removed, so there is no conflict concept.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryEventRepository`] - In-process log
/// - [`crate::infrastructure::persistence::PgEventRepository`] - PostgreSQL backend
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Appends an event to the log.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend errors.
    async fn create(&self, event: Event) -> Result<(), AppError>;

    /// Returns all events whose subject has the given key, in append order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no event exists for the key; an
    /// empty result is never returned.
    /// Returns [`AppError::Internal`] on backend errors.
    async fn find_by_subject_key(&self, key: &str) -> Result<Vec<Event>, AppError>;

    /// Verifies the backend is reachable.
    async fn health_check(&self) -> Result<(), AppError>;
}
