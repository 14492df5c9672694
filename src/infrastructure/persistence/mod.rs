//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits. The server picks
//! a backend per repository from configuration.
//!
//! # Repositories
//!
//! - [`MemoryRedirectionRepository`] - In-process registry
//! - [`RedisRedirectionRepository`] - Redis registry (`SET NX` / `GETDEL`)
//! - [`MemoryEventRepository`] - In-process event log
//! - [`PgEventRepository`] - PostgreSQL event log

pub mod memory_event_repository;
pub mod memory_redirection_repository;
pub mod pg_event_repository;
pub mod redis_redirection_repository;

pub use memory_event_repository::MemoryEventRepository;
pub use memory_redirection_repository::MemoryRedirectionRepository;
pub use pg_event_repository::PgEventRepository;
pub use redis_redirection_repository::RedisRedirectionRepository;
