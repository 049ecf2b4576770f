//! Validation errors for inbound webhook payloads.
//!
//! Validation failures are raised before any remote call is made, keeping
//! them distinct from downstream transport and remote-status failures.

use thiserror::Error;

/// Result type alias using `ValidationError`.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors produced while parsing and validating an inbound payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Request body was not valid JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Payload object did not match the expected shape for the event.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A required field was present but empty.
    #[error("field must not be empty: {0}")]
    EmptyField(&'static str),

    /// Search was requested without any criteria.
    #[error("provide at least one search criterion")]
    MissingCriteria,
}
