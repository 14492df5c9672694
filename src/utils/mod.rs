//! Utility functions for key generation and input validation.
//!
//! - [`key_generator`] - Seedable short key generation
//! - [`url_validator`] - Absolute URL validation for redirection locations

pub mod key_generator;
pub mod url_validator;
