//! Error types for DigitalOcean API operations.
//!
//! This module provides a single error type covering request construction,
//! transport failures, structured API errors and malformed responses.

use serde::Deserialize;
use thiserror::Error;

/// Main error type for DigitalOcean API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Client configuration is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Base URL or resolved endpoint is invalid
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request could not be constructed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP exchange failed before a response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// The HTTP exchange timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API answered with a structured error body
    #[error(transparent)]
    Api(ApiError),

    /// The API answered with a failing status and a body that is not an API error
    #[error("Unexpected response (status {status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A successful response could not be decoded
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Failure of a named client operation
    #[error("Error {operation}: {source}")]
    Operation {
        /// Operation being performed, e.g. `creating droplet`
        operation: &'static str,
        /// Underlying cause
        source: Box<Error>,
    },
}

/// Specialized result type for DigitalOcean API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error returned by the API for a failing request.
///
/// Only produced by [`classify_response`](crate::http::classify_response).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("API Error: {code}: {message}")]
pub struct ApiError {
    code: String,
    message: String,
    status: u16,
}

impl ApiError {
    pub(crate) fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// Machine-readable error identifier, e.g. `unprocessable_entity`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status the error arrived with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }
}

/// Wire shape of an API error body: `{"id": "...", "message": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) message: String,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Api(_) => "API_ERROR",
            Self::UnexpectedResponse { .. } => "UNEXPECTED_RESPONSE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::Operation { source, .. } => source.error_code(),
        }
    }

    /// Wraps the error with the name of the operation that failed.
    #[must_use]
    pub fn during(self, operation: &'static str) -> Self {
        Self::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping operation context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the structured API error, if this error came from one.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self.root() {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failing response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Api(err) => Some(err.status()),
            Self::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the failure happened below the API, in the transport.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Self::Transport(_) | Self::Timeout(_))
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unprocessable() -> Error {
        Error::Api(ApiError::new(
            "unprocessable_entity",
            "You specified an invalid size for Droplet creation.",
            422,
        ))
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::InvalidRequest("test".to_string()).error_code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            Error::Transport("test".to_string()).error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(unprocessable().error_code(), "API_ERROR");
        assert_eq!(
            Error::UnexpectedResponse {
                status: 500,
                body: String::new()
            }
            .error_code(),
            "UNEXPECTED_RESPONSE"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            unprocessable().during("creating droplet").error_code(),
            "API_ERROR"
        );
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            unprocessable().to_string(),
            "API Error: unprocessable_entity: You specified an invalid size for Droplet creation."
        );
    }

    #[test]
    fn test_operation_display() {
        let err = unprocessable().during("processing droplet action");
        assert_eq!(
            err.to_string(),
            "Error processing droplet action: API Error: unprocessable_entity: \
             You specified an invalid size for Droplet creation."
        );
    }

    #[test]
    fn test_accessors_see_through_operation() {
        let err = unprocessable().during("creating droplet");
        let api = err.api_error().unwrap();
        assert_eq!(api.code(), "unprocessable_entity");
        assert_eq!(api.status(), 422);
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_transport());

        let err = Error::Transport("connection refused".to_string()).during("destroying droplet");
        assert!(err.is_transport());
        assert!(err.api_error().is_none());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unexpected_response_status() {
        let err = Error::UnexpectedResponse {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "Unexpected response (status 502): bad gateway");
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::ParseError(_)));
    }

    #[test]
    fn test_error_clone() {
        let err = unprocessable().during("retrieving droplet");
        assert_eq!(err.clone(), err);
    }
}
