//! Redirection entity mapping a short key to a destination location.

use serde::Serialize;
use serde_json::json;

use crate::error::AppError;
use crate::utils::url_validator::validate_location;

/// A short key bound to an absolute destination URL.
///
/// Both fields are fixed at construction. A redirection is never updated in
/// place: it is created once and later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Redirection {
    key: String,
    location: String,
}

impl Redirection {
    /// Creates a validated redirection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `key` is empty or `location` is not
    /// an absolute URL.
    pub fn new(key: impl Into<String>, location: impl Into<String>) -> Result<Self, AppError> {
        let key = key.into();
        let location = location.into();

        if key.is_empty() {
            return Err(AppError::bad_request(
                "the field key is required",
                json!({ "field": "key" }),
            ));
        }

        validate_location(&location).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "field": "location", "value": location }))
        })?;

        Ok(Self { key, location })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}
