//! Lifecycle event entity recorded for every redirection transition.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

use super::redirection::Redirection;
use crate::error::AppError;

/// The kind of lifecycle transition an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Created,
    Read,
    Deleted,
}

impl EventType {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::Read => "read",
            EventType::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(EventType::Created),
            "read" => Ok(EventType::Read),
            "deleted" => Ok(EventType::Deleted),
            other => Err(AppError::internal(
                format!("unknown event type {other}"),
                json!({ "event_type": other }),
            )),
        }
    }
}

/// An immutable record of one transition of a redirection.
///
/// The subject is held by value so that deleting a redirection leaves its
/// history intact and queryable by key.
///
/// # Timestamps
///
/// `timestamp` is an RFC 3339 UTC string with second precision
/// (`2022-01-01T12:00:00Z`) assigned when the event is built. It reflects wall
/// clock only; ordering under concurrency comes from the dispatcher queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    subject: Redirection,
    event_type: EventType,
    timestamp: String,
}

impl Event {
    /// Creates an event with an explicit timestamp.
    pub fn new(timestamp: impl Into<String>, event_type: EventType, subject: Redirection) -> Self {
        Self {
            subject,
            event_type,
            timestamp: timestamp.into(),
        }
    }

    /// Creates an event stamped with the current UTC time.
    pub fn now(event_type: EventType, subject: Redirection) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Self::new(timestamp, event_type, subject)
    }

    pub fn created(subject: Redirection) -> Self {
        Self::now(EventType::Created, subject)
    }

    pub fn read(subject: Redirection) -> Self {
        Self::now(EventType::Read, subject)
    }

    pub fn deleted(subject: Redirection) -> Self {
        Self::now(EventType::Deleted, subject)
    }

    /// Redirection this event refers to, as it was when the event was built.
    pub fn subject(&self) -> &Redirection {
        &self.subject
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Key of the redirection this event refers to.
    pub fn subject_key(&self) -> &str {
        self.subject.key()
    }
}
