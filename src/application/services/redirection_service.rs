//! Redirection use cases: create, delete, resolve, count and list.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::dispatcher::EventDispatcher;
use crate::domain::entities::{Event, EventType, Redirection};
use crate::domain::repositories::{EventRepository, RedirectionRepository};
use crate::error::AppError;
use crate::utils::key_generator::KeyGenerator;
use crate::utils::url_validator::validate_location;

/// Default number of keys tried before a collision is reported.
pub const DEFAULT_MAX_KEY_ATTEMPTS: usize = 5;

/// Orchestrates repositories, key generation and event dispatch.
///
/// Every use case that changes or resolves a redirection emits exactly one
/// lifecycle event after the repository call succeeded. Failed calls emit
/// nothing.
pub struct RedirectionService<R, E>
where
    R: RedirectionRepository + ?Sized,
    E: EventRepository + ?Sized,
{
    redirections: Arc<R>,
    events: Arc<E>,
    key_generator: Arc<dyn KeyGenerator>,
    dispatcher: Arc<EventDispatcher>,
    max_key_attempts: usize,
}

impl<R, E> RedirectionService<R, E>
where
    R: RedirectionRepository + ?Sized,
    E: EventRepository + ?Sized,
{
    /// Creates a new redirection service.
    pub fn new(
        redirections: Arc<R>,
        events: Arc<E>,
        key_generator: Arc<dyn KeyGenerator>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            redirections,
            events,
            key_generator,
            dispatcher,
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
        }
    }

    /// Sets how many generated keys `create_redirection` tries (minimum 1).
    pub fn with_max_key_attempts(mut self, attempts: usize) -> Self {
        self.max_key_attempts = attempts.max(1);
        self
    }

    /// Registers `location` under a freshly generated key and returns the key.
    ///
    /// The location is stored verbatim. When the repository reports a key
    /// collision a new key is generated, up to the configured attempt count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `location` is not an absolute URL.
    /// Returns [`AppError::Conflict`] if every generated key was taken.
    /// Returns [`AppError::Internal`] on backend errors.
    pub async fn create_redirection(&self, location: &str) -> Result<String, AppError> {
        validate_location(location)
            .map_err(|e| {
                AppError::bad_request(e.to_string(), json!({ "field": "location", "value": location }))
            })
            .map_err(|e| e.context("create_redirection"))?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let key = self.key_generator.next_key();
            let redirection =
                Redirection::new(key.clone(), location).map_err(|e| e.context("create_redirection"))?;

            match self.redirections.create(redirection.clone()).await {
                Ok(()) => {
                    info!(key = %key, location, attempt, "Redirection created");
                    self.dispatcher.dispatch(Event::created(redirection)).await;
                    return Ok(key);
                }
                Err(e) if e.is_conflict() && attempt < self.max_key_attempts => {
                    warn!(key = %key, attempt, "Generated key already taken, retrying");
                }
                Err(e) => return Err(e.context("create_redirection")),
            }
        }
    }

    /// Deletes the redirection stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `key` is empty.
    /// Returns [`AppError::NotFound`] if the key is absent.
    /// Returns [`AppError::Internal`] on backend errors.
    pub async fn delete_redirection(&self, key: &str) -> Result<(), AppError> {
        require_key(key).map_err(|e| e.context("delete_redirection"))?;

        let redirection = self
            .redirections
            .find_by_key(key)
            .await
            .map_err(|e| e.context("delete_redirection"))?;

        self.redirections
            .delete(&redirection)
            .await
            .map_err(|e| e.context("delete_redirection"))?;

        info!(key, "Redirection deleted");
        self.dispatcher.dispatch(Event::deleted(redirection)).await;
        Ok(())
    }

    /// Resolves `key` to its location and records a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `key` is empty.
    /// Returns [`AppError::NotFound`] if the key is absent.
    /// Returns [`AppError::Internal`] on backend errors.
    pub async fn get_redirection_location(&self, key: &str) -> Result<String, AppError> {
        require_key(key).map_err(|e| e.context("get_redirection_location"))?;

        let redirection = self
            .redirections
            .find_by_key(key)
            .await
            .map_err(|e| e.context("get_redirection_location"))?;

        let location = redirection.location().to_string();
        debug!(key, location = %location, "Redirection resolved");
        self.dispatcher.dispatch(Event::read(redirection)).await;

        Ok(location)
    }

    /// Looks up the redirection stored under `key` without recording a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `key` is empty.
    /// Returns [`AppError::NotFound`] if the key is absent.
    /// Returns [`AppError::Internal`] on backend errors.
    pub async fn get_redirection(&self, key: &str) -> Result<Redirection, AppError> {
        require_key(key).map_err(|e| e.context("get_redirection"))?;

        self.redirections
            .find_by_key(key)
            .await
            .map_err(|e| e.context("get_redirection"))
    }

    /// Counts the recorded visits of `key`.
    ///
    /// Only `read` events count. A key without any recorded event has a count
    /// of zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `key` is empty.
    /// Returns [`AppError::NotFound`] if the key is absent.
    /// Returns [`AppError::Internal`] on backend errors.
    pub async fn get_redirection_count(&self, key: &str) -> Result<usize, AppError> {
        require_key(key).map_err(|e| e.context("get_redirection_count"))?;

        self.redirections
            .find_by_key(key)
            .await
            .map_err(|e| e.context("get_redirection_count"))?;

        let events = match self.events.find_by_subject_key(key).await {
            Ok(events) => events,
            Err(e) if e.is_not_found() => return Ok(0),
            Err(e) => return Err(e.context("get_redirection_count")),
        };

        Ok(events
            .iter()
            .filter(|event| event.event_type() == EventType::Read)
            .count())
    }

    /// Lists the keys of every stored redirection in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend errors.
    pub async fn list_redirections(&self) -> Result<Vec<String>, AppError> {
        let redirections = self
            .redirections
            .find_all()
            .await
            .map_err(|e| e.context("list_redirections"))?;

        Ok(redirections
            .into_iter()
            .map(|redirection| redirection.key().to_string())
            .collect())
    }

    /// Probes the redirection backend.
    pub async fn check_redirection_store(&self) -> Result<(), AppError> {
        self.redirections.health_check().await
    }

    /// Probes the event backend.
    pub async fn check_event_store(&self) -> Result<(), AppError> {
        self.events.health_check().await
    }

    /// Returns `true` while the dispatcher accepts events.
    pub fn is_dispatching(&self) -> bool {
        self.dispatcher.is_running()
    }
}

fn require_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() {
        return Err(AppError::bad_request(
            "the field key is required",
            json!({ "field": "key" }),
        ));
    }
    Ok(())
}
