//! # Client Error Types
//!
//! Unified error handling for the Pipedrive resource clients. Validation
//! failures are raised before any request leaves the process; API failures
//! carry the status code and raw response body for diagnostics.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// A rejected input: which field, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Comprehensive error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid response: {field} - {reason}")]
    InvalidResponse { field: String, reason: String },
}

impl ClientError {
    /// Create an API error from a non-2xx response
    pub fn api_error(status: u16, message: impl Into<String>, body: Value) -> Self {
        Self::Api {
            status,
            message: message.into(),
            body,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid response error for envelopes that break the API contract
    pub fn invalid_response(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, message))
    }

    /// Check if error is recoverable (worth retrying by the caller)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::HttpError(e) => e.is_timeout() || e.is_connect(),
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Raw response body attached to an API error, if any.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            ClientError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- Constructor tests ----

    #[test]
    fn test_api_error_constructor() {
        let err = ClientError::api_error(404, "Deal not found", json!({"success": false}));
        match err {
            ClientError::Api {
                status,
                message,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Deal not found");
                assert_eq!(body, json!({"success": false}));
            }
            _ => panic!("Expected Api variant"),
        }
    }

    #[test]
    fn test_config_error_constructor() {
        let err = ClientError::config_error("missing token");
        match err {
            ClientError::ConfigError(msg) => assert_eq!(msg, "missing token"),
            _ => panic!("Expected ConfigError variant"),
        }
    }

    #[test]
    fn test_invalid_response_constructor() {
        let err = ClientError::invalid_response("body", "not JSON");
        match err {
            ClientError::InvalidResponse { field, reason } => {
                assert_eq!(field, "body");
                assert_eq!(reason, "not JSON");
            }
            _ => panic!("Expected InvalidResponse variant"),
        }
    }

    #[test]
    fn test_validation_constructor() {
        let err = ClientError::validation("title", "Deal title cannot be empty");
        assert!(err.is_validation());
        match err {
            ClientError::Validation(v) => {
                assert_eq!(v.field, "title");
                assert_eq!(v.message, "Deal title cannot be empty");
            }
            _ => panic!("Expected Validation variant"),
        }
    }

    // ---- is_recoverable tests ----

    #[test]
    fn test_api_5xx_is_recoverable() {
        assert!(ClientError::api_error(500, "boom", Value::Null).is_recoverable());
        assert!(ClientError::api_error(503, "unavailable", Value::Null).is_recoverable());
    }

    #[test]
    fn test_api_4xx_not_recoverable() {
        assert!(!ClientError::api_error(400, "bad", Value::Null).is_recoverable());
        assert!(!ClientError::api_error(404, "missing", Value::Null).is_recoverable());
    }

    #[test]
    fn test_validation_not_recoverable() {
        assert!(!ClientError::validation("limit", "bad").is_recoverable());
    }

    #[test]
    fn test_invalid_response_not_recoverable() {
        assert!(!ClientError::invalid_response("data", "wrong type").is_recoverable());
    }

    // ---- Display tests ----

    #[test]
    fn test_validation_display_is_bare_message() {
        let err = ClientError::validation("status", "Lost reason can only be set when status is 'lost'");
        assert_eq!(
            err.to_string(),
            "Lost reason can only be set when status is 'lost'"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(401, "Unauthorized", Value::Null);
        assert_eq!(err.to_string(), "API error: 401 - Unauthorized");
    }

    #[test]
    fn test_config_error_display() {
        let err = ClientError::config_error("bad domain");
        assert_eq!(err.to_string(), "Configuration error: bad domain");
    }

    // ---- From conversions ----

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::SerializationError(_)));
    }

    #[test]
    fn test_from_validation_error() {
        let err: ClientError = ValidationError::new("content", "Note content cannot be empty").into();
        assert!(err.is_validation());
        assert!(err.response_body().is_none());
    }

    #[test]
    fn test_response_body_on_api_error() {
        let body = json!({"success": false, "error": "Scope denied"});
        let err = ClientError::api_error(403, "Scope denied", body.clone());
        assert_eq!(err.response_body(), Some(&body));
    }
}
