//! HTTP server initialization and runtime setup.
//!
//! Handles backend connections, dispatcher startup, the Axum server lifecycle
//! and the final drain of queued events.

use crate::application::listeners::{EventLogger, EventStore};
use crate::application::services::RedirectionService;
use crate::config::Config;
use crate::domain::dispatcher::EventDispatcher;
use crate::domain::listener::Listener;
use crate::domain::repositories::{EventRepository, RedirectionRepository};
use crate::infrastructure::persistence::{
    MemoryEventRepository, MemoryRedirectionRepository, PgEventRepository,
    RedisRedirectionRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::key_generator::{KeyGenerator, RandomKeyGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

/// Backoff used for every startup connection attempt: 100ms doubling, capped
/// at 5s, five retries.
fn connect_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(5)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redirection repository (Redis or in-memory)
/// - Event repository (PostgreSQL with migrations, or in-memory)
/// - Event dispatcher with the audit logger and the event store
/// - Axum HTTP server with graceful shutdown
///
/// After the server stops, queued events are drained for at most
/// `SHUTDOWN_DRAIN_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns an error if:
/// - A configured backend stays unreachable after retries
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let redirections = connect_redirections(&config).await?;
    let events = connect_events(&config).await?;

    let key_generator: Arc<dyn KeyGenerator> = match config.key_seed {
        Some(seed) => Arc::new(RandomKeyGenerator::new(seed)),
        None => Arc::new(RandomKeyGenerator::from_entropy()),
    };

    let listeners: Vec<Arc<dyn Listener>> = vec![
        Arc::new(EventLogger::new()),
        Arc::new(EventStore::new(events.clone())),
    ];
    let dispatcher = Arc::new(EventDispatcher::start(config.dispatcher_config(), listeners));

    let service = RedirectionService::new(redirections, events, key_generator, dispatcher.clone())
        .with_max_key_attempts(config.key_max_attempts);

    let app = app_router(AppState::new(Arc::new(service)));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining events");

    if tokio::time::timeout(config.shutdown_drain_timeout(), dispatcher.shutdown())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = config.shutdown_drain_timeout_secs,
            "Event drain timed out, remaining events are lost"
        );
    }

    Ok(())
}

async fn connect_redirections(config: &Config) -> Result<Arc<dyn RedirectionRepository>> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        info!("Redirections stored in memory");
        return Ok(Arc::new(MemoryRedirectionRepository::new()));
    };

    let repository = Retry::start(connect_strategy(), || async move {
        RedisRedirectionRepository::connect(redis_url)
            .await
            .inspect_err(|e| warn!(error = %e, "Redis connection attempt failed"))
    })
    .await
    .context("Failed to connect to Redis")?;

    info!("Redirections stored in Redis");
    Ok(Arc::new(repository))
}

async fn connect_events(config: &Config) -> Result<Arc<dyn EventRepository>> {
    let Some(database_url) = config.database_url.as_deref() else {
        info!("Events stored in memory");
        return Ok(Arc::new(MemoryEventRepository::new()));
    };

    let pool = Retry::start(connect_strategy(), || async move {
        PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .connect(database_url)
            .await
            .inspect_err(|e| warn!(error = %e, "Database connection attempt failed"))
    })
    .await
    .context("Failed to connect to PostgreSQL")?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    info!("Events stored in PostgreSQL");
    Ok(Arc::new(PgEventRepository::new(Arc::new(pool))))
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_connect_strategy_is_bounded() {
        let delays: Vec<Duration> = connect_strategy().collect();
        assert_eq!(delays.len(), 5);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_connect_retries_until_success() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, &str> = Retry::start(connect_strategy(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if attempt < 3 { Err("unavailable") } else { Ok(attempt) } }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_backends_default_to_memory() {
        let config = Config::default();

        let redirections = connect_redirections(&config).await.unwrap();
        let events = connect_events(&config).await.unwrap();

        assert!(redirections.health_check().await.is_ok());
        assert!(events.health_check().await.is_ok());
    }
}
