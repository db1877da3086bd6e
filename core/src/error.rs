//! Error types for lead validation and the CRM relay.
//!
//! # Design
//! Validation and relay failures are kept apart because they end up on
//! opposite sides of the response taxonomy: a `ValidationError` is always the
//! caller's fault and always surfaced, while a `RelayError` is an upstream
//! problem whose visibility depends on the deployment's relay policy.

use std::time::Duration;

use thiserror::Error;

/// A submission that cannot be forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Neither an email address nor a phone number was supplied.
    #[error("Email or phone is required")]
    MissingContact,
}

/// Failure to deliver a lead to Follow Up Boss.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Follow Up Boss answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// No answer arrived before the relay deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The event could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RelayError {
    /// Upstream status code, when the CRM answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RelayError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Diagnostic text for operators: the raw CRM body when there is one,
    /// otherwise the error message itself.
    pub fn details(&self) -> String {
        match self {
            RelayError::HttpStatus { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}
