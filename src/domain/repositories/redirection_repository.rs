//! Repository trait for redirection storage.

use crate::domain::entities::Redirection;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for redirections.
///
/// Every backend shares the same error semantics so that the application
/// layer never needs to know which one it talks to. No retries happen at this
/// layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryRedirectionRepository`] - In-process map
/// - [`crate::infrastructure::persistence::RedisRedirectionRepository`] - Redis backend
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectionRepository: Send + Sync {
    /// Stores a new redirection.
    ///
    /// The uniqueness check and the insert are a single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a redirection with the same key exists.
    /// Returns [`AppError::Internal`] on backend errors.
    async fn create(&self, redirection: Redirection) -> Result<(), AppError>;

    /// Removes a redirection by its key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key is absent.
    /// Returns [`AppError::Internal`] on backend errors.
    async fn delete(&self, redirection: &Redirection) -> Result<(), AppError>;

    /// Finds a redirection by key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key is absent.
    /// Returns [`AppError::Internal`] on backend errors.
    async fn find_by_key(&self, key: &str) -> Result<Redirection, AppError>;

    /// Lists every stored redirection in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend errors.
    async fn find_all(&self) -> Result<Vec<Redirection>, AppError>;

    /// Verifies the backend is reachable.
    async fn health_check(&self) -> Result<(), AppError>;
}
