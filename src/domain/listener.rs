//! Consumer contract for dispatched lifecycle events.

use async_trait::async_trait;

use crate::domain::entities::Event;
use crate::error::AppError;

/// A consumer registered with the [`crate::domain::dispatcher::EventDispatcher`].
///
/// Listeners run one at a time on the dispatcher task, so a slow listener
/// delays every later delivery. Errors are logged by the dispatcher and never
/// reach the code that dispatched the event.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Short identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Reacts to a single event.
    ///
    /// # Errors
    ///
    /// Any error is listener-local: it is logged and counted, and the event is
    /// not retried.
    async fn consume(&self, event: &Event) -> Result<(), AppError>;
}
