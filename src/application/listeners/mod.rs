//! Built-in consumers of lifecycle events.
//!
//! Both are registered with the dispatcher at startup in this order:
//!
//! 1. [`EventLogger`] - Structured audit line per event
//! 2. [`EventStore`] - Appends the event to the event repository

pub mod event_logger;
pub mod event_store;

pub use event_logger::EventLogger;
pub use event_store::EventStore;
