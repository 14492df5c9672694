//! Domain layer containing business entities and contracts.
//!
//! The domain layer has no dependency on storage or transport. It defines the
//! entities, the repository traits implemented by the infrastructure layer and
//! the in-process event dispatcher.
//!
//! # Architecture
//!
//! - [`entities`] - Redirection and lifecycle event data model
//! - [`repositories`] - Storage contracts
//! - [`listener`] - Consumer contract for dispatched events
//! - [`dispatcher`] - Ordered asynchronous fan-out of events to listeners
//!
//! # Event Flow
//!
//! 1. A use case in [`crate::application::services`] mutates or reads a redirection
//! 2. It builds an [`entities::Event`] and hands it to [`dispatcher::EventDispatcher`]
//! 3. The dispatch loop calls each [`listener::Listener`] in registration order
//! 4. Listeners log the event and append it to the [`repositories::EventRepository`]

pub mod dispatcher;
pub mod entities;
pub mod listener;
pub mod repositories;
