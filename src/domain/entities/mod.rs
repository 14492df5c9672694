//! Core domain entities.
//!
//! - [`Redirection`] - A short key bound to a destination URL
//! - [`Event`] - An immutable record of a redirection lifecycle transition
//!
//! Entities validate their invariants at construction and expose no mutators.

pub mod event;
pub mod redirection;

pub use event::{Event, EventType};
pub use redirection::Redirection;
