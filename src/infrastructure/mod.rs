//! Infrastructure layer for external integrations.
//!
//! This layer implements the storage traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Redis, PostgreSQL and in-memory repositories

pub mod persistence;
