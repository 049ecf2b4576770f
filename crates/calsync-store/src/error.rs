//! Error types for data API operations.
//!
//! Every outbound call returns an explicit result; remote-reported failures
//! are kept distinct from transport failures so the dispatcher can choose
//! the correct response status.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures while talking to the remote data API.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Network-level failure contacting the data API.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the network failure.
        message: String,
    },

    /// Outbound request exceeded the configured timeout.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Configured timeout in seconds.
        timeout_seconds: u64,
    },

    /// Data API reported a non-success status on insert or update.
    #[error("remote write failed: HTTP {status}")]
    RemoteWrite {
        /// HTTP status returned by the data API.
        status: u16,
        /// Remote error body, for diagnostics.
        body: String,
    },

    /// Data API reported a non-success status on search.
    #[error("remote read failed: HTTP {status}")]
    RemoteRead {
        /// HTTP status returned by the data API.
        status: u16,
        /// Remote error body, for diagnostics.
        body: String,
    },

    /// Data API returned a body this service could not decode.
    #[error("invalid response from data API: {message}")]
    InvalidResponse {
        /// Description of the decoding failure.
        message: String,
    },

    /// Client could not be constructed from the given configuration.
    #[error("store configuration error: {message}")]
    Configuration {
        /// Configuration error message.
        message: String,
    },
}

impl StoreError {
    /// Creates a transport error from a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates a remote write error from an HTTP response.
    pub fn remote_write(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteWrite { status, body: body.into() }
    }

    /// Creates a remote read error from an HTTP response.
    pub fn remote_read(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteRead { status, body: body.into() }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse { message: message.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// True when the failure came from a search rather than a mutation.
    ///
    /// The webhook contract maps failed reads and failed writes to different
    /// response statuses, so the dispatcher needs the distinction.
    pub const fn is_read_failure(&self) -> bool {
        matches!(self, Self::RemoteRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_carry_status() {
        let err = StoreError::remote_write(409, "duplicate key");
        assert_eq!(err.to_string(), "remote write failed: HTTP 409");

        let err = StoreError::timeout(10);
        assert_eq!(err.to_string(), "request timeout after 10s");
    }

    #[test]
    fn read_failures_distinguished_from_writes() {
        assert!(StoreError::remote_read(500, "boom").is_read_failure());
        assert!(!StoreError::remote_write(500, "boom").is_read_failure());
        assert!(!StoreError::transport("refused").is_read_failure());
    }
}
