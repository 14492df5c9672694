//! Business logic services for the application layer.

pub mod redirection_service;

pub use redirection_service::RedirectionService;
