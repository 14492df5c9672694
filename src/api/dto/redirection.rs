//! DTOs for redirection endpoints.
//!
//! Responses follow the JSON Hypertext Application Language shape: each
//! resource carries a `_links` object pointing at related endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new redirection.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRedirectionRequest {
    /// Absolute destination URL, stored verbatim.
    #[validate(url(message = "Invalid URL format"))]
    pub location: String,
}

/// A single hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HalLink {
    pub href: String,
}

impl HalLink {
    fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

pub fn resource_path(key: &str) -> String {
    format!("/api/redirections/{key}")
}

pub fn count_path(key: &str) -> String {
    format!("/api/redirections/{key}/count")
}

pub fn consume_path(key: &str) -> String {
    format!("/{key}")
}

#[derive(Debug, Serialize)]
pub struct RedirectionLinks {
    #[serde(rename = "self")]
    pub self_link: HalLink,
    pub count: HalLink,
    pub consume: HalLink,
}

/// One redirection as exposed over HTTP.
#[derive(Debug, Serialize)]
pub struct RedirectionRepresentation {
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(rename = "_links")]
    pub links: RedirectionLinks,
}

impl RedirectionRepresentation {
    /// Key-only representation, as used in listings.
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            links: RedirectionLinks {
                self_link: HalLink::new(resource_path(&key)),
                count: HalLink::new(count_path(&key)),
                consume: HalLink::new(consume_path(&key)),
            },
            location: None,
            key,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct SelfLinks {
    #[serde(rename = "self")]
    pub self_link: HalLink,
}

/// Listing of every registered redirection.
#[derive(Debug, Serialize)]
pub struct RedirectionListRepresentation {
    pub items: Vec<RedirectionRepresentation>,

    #[serde(rename = "_links")]
    pub links: SelfLinks,
}

impl RedirectionListRepresentation {
    pub fn from_keys(keys: Vec<String>) -> Self {
        Self {
            items: keys
                .into_iter()
                .map(RedirectionRepresentation::from_key)
                .collect(),
            links: SelfLinks {
                self_link: HalLink::new("/api/redirections"),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountLinks {
    #[serde(rename = "self")]
    pub self_link: HalLink,
    pub parent: HalLink,
}

/// Visit count of one redirection.
#[derive(Debug, Serialize)]
pub struct RedirectionCountRepresentation {
    pub count: usize,

    #[serde(rename = "_links")]
    pub links: CountLinks,
}

impl RedirectionCountRepresentation {
    pub fn new(key: &str, count: usize) -> Self {
        Self {
            count,
            links: CountLinks {
                self_link: HalLink::new(count_path(key)),
                parent: HalLink::new(resource_path(key)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redirection_representation_shape() {
        let value = serde_json::to_value(RedirectionRepresentation::from_key("abc123")).unwrap();

        assert_eq!(
            value,
            json!({
                "key": "abc123",
                "_links": {
                    "self": { "href": "/api/redirections/abc123" },
                    "count": { "href": "/api/redirections/abc123/count" },
                    "consume": { "href": "/abc123" }
                }
            })
        );
    }

    #[test]
    fn test_count_representation_shape() {
        let value = serde_json::to_value(RedirectionCountRepresentation::new("abc123", 2)).unwrap();

        assert_eq!(value["count"], 2);
        assert_eq!(value["_links"]["parent"]["href"], "/api/redirections/abc123");
    }

    #[test]
    fn test_create_request_rejects_relative_url() {
        let request = CreateRedirectionRequest {
            location: "not-a-url".to_string(),
        };
        assert!(request.validate().is_err());

        let request = CreateRedirectionRequest {
            location: "https://example.com/path".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
