//! Error handling for the feature client.
//!
//! Every failed HTTP exchange surfaces as [`FeatureError::Request`], whatever
//! went wrong underneath: a non-success status, a refused connection or a body
//! that is not JSON. The underlying cause stays reachable through
//! [`std::error::Error::source`].

use thiserror::Error;

/// Result type alias for feature client operations
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Main error type for the feature client and dev server
#[derive(Error, Debug)]
pub enum FeatureError {
    /// A failed HTTP exchange, carrying the operation-specific message
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        cause: RequestFailure,
    },

    /// Base URL could not be parsed or cannot carry path segments
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Dev server errors
    #[error("Server error: {0}")]
    Server(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What actually went wrong underneath a [`FeatureError::Request`]
#[derive(Error, Debug)]
pub enum RequestFailure {
    /// The server answered with a status outside the success range
    #[error("server responded with status {0}")]
    Status(reqwest::StatusCode),

    /// The request never completed (DNS, refused connection, encode failure)
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Success status, but the body is not valid JSON for the expected type
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl FeatureError {
    /// Create a request error with the given message and cause
    pub fn request(message: impl Into<String>, cause: RequestFailure) -> Self {
        FeatureError::Request {
            message: message.into(),
            cause,
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        FeatureError::InvalidUrl(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        FeatureError::Config(msg.into())
    }

    /// Whether this is a failed HTTP exchange
    pub fn is_request_error(&self) -> bool {
        matches!(self, FeatureError::Request { .. })
    }

    /// HTTP status of the failed exchange, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FeatureError::Request {
                cause: RequestFailure::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_request_error_display_is_operation_message() {
        let err = FeatureError::request(
            "Failed to fetch feature",
            RequestFailure::Status(reqwest::StatusCode::NOT_FOUND),
        );

        assert_eq!(err.to_string(), "Failed to fetch feature");
        assert!(err.is_request_error());
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));

        let source = err.source().expect("request errors carry a cause");
        assert_eq!(
            source.to_string(),
            "server responded with status 404 Not Found"
        );
    }

    #[test]
    fn test_non_request_errors() {
        let err = FeatureError::config("base_url must not be empty");
        assert!(!err.is_request_error());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Config error: base_url must not be empty");
    }
}
