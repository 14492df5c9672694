//! Audit log listener.

use async_trait::async_trait;
use tracing::info;

use crate::domain::entities::Event;
use crate::domain::listener::Listener;
use crate::error::AppError;

/// Writes one structured `info` line per event under the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventLogger;

impl EventLogger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Listener for EventLogger {
    fn name(&self) -> &'static str {
        "event_logger"
    }

    async fn consume(&self, event: &Event) -> Result<(), AppError> {
        info!(
            target: "audit",
            key = event.subject().key(),
            location = event.subject().location(),
            event_type = %event.event_type(),
            timestamp = %event.timestamp(),
            "Redirection event"
        );
        Ok(())
    }
}
