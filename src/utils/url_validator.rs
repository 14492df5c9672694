//! Location validation for redirections.
//!
//! A location must parse as an absolute URL with a host. The input string is
//! never rewritten: what the caller stores is what a lookup returns.

use url::Url;

/// Errors that can occur while validating a location.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("the field location is required")]
    Empty,

    #[error("the field location must be a valid URL: {0}")]
    InvalidFormat(String),

    #[error("the field location must be an absolute URL with a host")]
    MissingHost,
}

/// Checks that `input` is an absolute URL with a host.
///
/// # Errors
///
/// Returns [`LocationError::Empty`] for blank input,
/// [`LocationError::InvalidFormat`] when the URL does not parse (this includes
/// relative references like `not-a-url` and any control character, which the
/// URL parser would otherwise strip from a string stored verbatim) and [`LocationError::MissingHost`] for
/// host-less forms such as `mailto:` or `data:`.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_location("http://example.com").is_ok());
/// assert!(validate_location("not-a-url").is_err());
/// ```
pub fn validate_location(input: &str) -> Result<(), LocationError> {
    if input.trim().is_empty() {
        return Err(LocationError::Empty);
    }

    if input.chars().any(char::is_control) {
        return Err(LocationError::InvalidFormat(
            "control characters are not allowed".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| LocationError::InvalidFormat(e.to_string()))?;

    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(LocationError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_location("http://example.com").is_ok());
        assert!(validate_location("https://www.google.com/search?q=rust").is_ok());
    }

    #[test]
    fn test_accepts_other_schemes_with_host() {
        assert!(validate_location("ftp://files.example.com/pub").is_ok());
    }

    #[test]
    fn test_rejects_relative_reference() {
        assert!(matches!(
            validate_location("not-a-url"),
            Err(LocationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_control_characters() {
        for input in [
            "http://example.com/a\nb",
            "http://example.com/a\r\nb",
            "http://exa\tmple.com",
            "http://example.com/\u{7f}",
        ] {
            assert!(
                matches!(validate_location(input), Err(LocationError::InvalidFormat(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_location(""), Err(LocationError::Empty));
        assert_eq!(validate_location("   "), Err(LocationError::Empty));
    }

    #[test]
    fn test_rejects_hostless_urls() {
        assert_eq!(
            validate_location("mailto:someone@example.com"),
            Err(LocationError::MissingHost)
        );
        assert_eq!(
            validate_location("data:text/plain,hello"),
            Err(LocationError::MissingHost)
        );
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = validate_location("not-a-url").unwrap_err();
        assert!(err.to_string().contains("location"));
    }
}
