//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::RedirectionService;
use crate::domain::repositories::{EventRepository, RedirectionRepository};

/// Service type with the repository backends erased, so one state type serves
/// every backend combination.
pub type DynRedirectionService = RedirectionService<dyn RedirectionRepository, dyn EventRepository>;

#[derive(Clone)]
pub struct AppState {
    pub redirection_service: Arc<DynRedirectionService>,
}

impl AppState {
    pub fn new(redirection_service: Arc<DynRedirectionService>) -> Self {
        Self {
            redirection_service,
        }
    }
}
