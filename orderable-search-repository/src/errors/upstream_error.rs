//! Upstream error types.
//!
//! Every failed call to the search index, catalog, supplier or customer service is
//! reported as an `UpstreamError`. The three failure kinds that come off the wire
//! (no response, non-2xx response, unreadable response) carry the method and URL of
//! the request so a log line alone is enough to diagnose them.

use thiserror::Error;

/// Unified errors from upstream service calls.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    /// No response was received (connection refused, DNS, timeout, ...).
    #[error("{method} {url} failed with: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
    },

    /// The service answered with a non-2xx status.
    #[error("{method} {url} failed with: HTTP error {status} - {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but the body was not the expected shape.
    #[error("{method} {url} returned a malformed response: {message}")]
    Malformed {
        method: String,
        url: String,
        message: String,
    },

    /// The request was rejected before being sent (e.g. an empty document id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },

    /// The client could not be constructed (bad base URL, TLS backend, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl UpstreamError {
    /// Create a transport error.
    pub fn transport(
        method: impl ToString,
        url: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            method: method.to_string(),
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error.
    pub fn status(
        method: impl ToString,
        url: impl ToString,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::Status {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(
        method: impl ToString,
        url: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            method: method.to_string(),
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The HTTP status, for errors that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message() {
        let err = UpstreamError::transport(
            "GET",
            "http://suppliers/suppliers?supplies_product=p1",
            "A non-HTTP error",
        );
        assert_eq!(
            err.to_string(),
            "GET http://suppliers/suppliers?supplies_product=p1 failed with: A non-HTTP error"
        );
    }

    #[test]
    fn test_status_message() {
        let err = UpstreamError::status(
            "POST",
            "http://search/indexes/orderable-products/batch",
            500,
            r#"{"message":"Internal Server Error"}"#,
        );
        assert_eq!(
            err.to_string(),
            r#"POST http://search/indexes/orderable-products/batch failed with: HTTP error 500 - {"message":"Internal Server Error"}"#
        );
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn test_status_code_absent_for_other_kinds() {
        assert_eq!(UpstreamError::validation("empty id").status_code(), None);
        assert_eq!(
            UpstreamError::malformed("GET", "http://x", "expected array").status_code(),
            None
        );
    }
}
