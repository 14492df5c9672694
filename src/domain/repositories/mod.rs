//! Repository trait definitions for the domain layer.
//!
//! These traits are the storage contracts the application layer depends on.
//! Concrete backends live in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`RedirectionRepository`] - Key to location registry
//! - [`EventRepository`] - Append-only lifecycle event log
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` under `cfg(test)`.
//! See `tests/repository_*.rs` for backend contract tests.

pub mod event_repository;
pub mod redirection_repository;

pub use event_repository::EventRepository;
pub use redirection_repository::RedirectionRepository;

#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use redirection_repository::MockRedirectionRepository;
