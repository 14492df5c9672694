//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! key generation and event dispatch. HTTP handlers only talk to the services.
//!
//! # Contents
//!
//! - [`services::RedirectionService`] - Create, delete, resolve, count and list
//! - [`listeners::EventLogger`] - Audit log consumer
//! - [`listeners::EventStore`] - Event log consumer

pub mod listeners;
pub mod services;
