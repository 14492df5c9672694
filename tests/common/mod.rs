#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use redirector::application::listeners::{EventLogger, EventStore};
use redirector::application::services::RedirectionService;
use redirector::domain::dispatcher::{DispatcherConfig, EventDispatcher};
use redirector::domain::listener::Listener;
use redirector::domain::repositories::{EventRepository, RedirectionRepository};
use redirector::infrastructure::persistence::{MemoryEventRepository, MemoryRedirectionRepository};
use redirector::state::{AppState, DynRedirectionService};
use redirector::utils::key_generator::RandomKeyGenerator;

pub const TEST_SEED: u64 = 0;

/// Fully wired application over in-memory backends.
pub struct TestApp {
    pub state: AppState,
    pub service: Arc<DynRedirectionService>,
    pub dispatcher: Arc<EventDispatcher>,
    pub redirections: Arc<MemoryRedirectionRepository>,
    pub events: Arc<MemoryEventRepository>,
}

impl TestApp {
    /// Waits until the event log holds at least `count` events.
    pub async fn wait_for_events(&self, count: usize) {
        let events = self.events.clone();
        tokio::time::timeout(Duration::from_secs(5), async move {
            while events.len().await < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("events were not stored in time");
    }
}

pub fn create_test_app(seed: u64) -> TestApp {
    let redirections = Arc::new(MemoryRedirectionRepository::new());
    let events = Arc::new(MemoryEventRepository::new());

    let redirection_repo: Arc<dyn RedirectionRepository> = redirections.clone();
    let event_repo: Arc<dyn EventRepository> = events.clone();

    let listeners: Vec<Arc<dyn Listener>> = vec![
        Arc::new(EventLogger::new()),
        Arc::new(EventStore::new(event_repo.clone())),
    ];
    let dispatcher = Arc::new(EventDispatcher::start(DispatcherConfig::default(), listeners));

    let service: Arc<DynRedirectionService> = Arc::new(RedirectionService::new(
        redirection_repo,
        event_repo,
        Arc::new(RandomKeyGenerator::new(seed)),
        dispatcher.clone(),
    ));

    TestApp {
        state: AppState::new(service.clone()),
        service,
        dispatcher,
        redirections,
        events,
    }
}
