//! Error types for the remote todo service

use thiserror::Error;

/// Errors that can occur when talking to the remote todo service
///
/// Errors are `Clone` so they can travel inside feedback actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Base URL could not be used to build request URLs
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (connection refused, TLS, DNS, ...)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The service answered with its `"Not found"` marker
    #[error("Not found")]
    NotFound,

    /// The service answered with a non-success status
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns `true` for [`ApiError::NotFound`]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed
    #[error("Invalid value for {key}: {value}")]
    Invalid {
        /// Variable name
        key: String,
        /// Offending value
        value: String,
    },

    /// Configuration parsed but is not usable
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_service_marker() {
        assert_eq!(ApiError::NotFound.to_string(), "Not found");
        assert!(ApiError::NotFound.is_not_found());
    }

    #[test]
    fn status_error_includes_code_and_body() {
        let error = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "API error (status 500): boom");
        assert!(!error.is_not_found());
    }
}
