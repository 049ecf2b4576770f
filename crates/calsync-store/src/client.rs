//! HTTP client for the relational data API.
//!
//! Builds authenticated requests against the bookings table resource:
//! JSON content type, a service-level bearer credential (distinct from the
//! webhook secret), and an optional JSON body. Transport failures and
//! remote-reported statuses are mapped into [`StoreError`] so callers never
//! see a raw HTTP error.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error};

use crate::error::{Result, StoreError};

/// Configuration for the data API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Fully qualified URL of the bookings table resource.
    pub base_url: String,
    /// Service credential authorized to write to the table.
    pub service_key: String,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout and user agent.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("calsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Client for the data API's table endpoint.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct DataApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl DataApiClient {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| StoreError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Inserts a row into the table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteWrite` on a non-success status, or a
    /// transport error when the data API is unreachable.
    pub async fn insert<T: Serialize + ?Sized>(&self, row: &T) -> Result<()> {
        debug!(url = %self.config.base_url, "inserting row");

        let response = self
            .authorized(self.client.post(&self.config.base_url))
            .json(row)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.check_write_status(response).await
    }

    /// Updates rows matching an `field=eq.value` query-string filter.
    ///
    /// Matching zero rows is a remote success; the data API reports it as
    /// an empty update, which keeps repeated cancels idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteWrite` on a non-success status, or a
    /// transport error when the data API is unreachable.
    pub async fn update_where<T: Serialize + ?Sized>(&self, query: &str, patch: &T) -> Result<()> {
        let url = format!("{}?{query}", self.config.base_url);
        debug!(url = %url, "updating rows");

        let response = self
            .authorized(self.client.patch(&url))
            .json(patch)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.check_write_status(response).await
    }

    /// Fetches rows matching a disjunctive filter expression.
    ///
    /// The expression is appended verbatim as the `or` query parameter;
    /// operand values must already be percent-encoded by the caller.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteRead` on a non-success status,
    /// `StoreError::InvalidResponse` when the body cannot be decoded, or a
    /// transport error when the data API is unreachable.
    pub async fn select<T: serde::de::DeserializeOwned>(&self, or_expr: &str) -> Result<Vec<T>> {
        let url = format!("{}?or={or_expr}", self.config.base_url);
        debug!(url = %url, "fetching rows");

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(status = status.as_u16(), body = %body, "data API rejected read");
            return Err(StoreError::remote_read(status.as_u16(), body));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::invalid_response(e.to_string()))
    }

    /// Attaches the content-type and service credential headers.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.service_key))
    }

    /// Converts a reqwest failure into a transport-level store error.
    fn map_transport(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            return StoreError::timeout(self.config.timeout.as_secs());
        }
        if err.is_connect() {
            return StoreError::transport(format!("connection failed: {err}"));
        }
        StoreError::transport(err.to_string())
    }

    /// Maps a write response status, logging the remote error body.
    async fn check_write_status(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = read_body(response).await;
        error!(status = status.as_u16(), body = %body, "data API rejected write");
        Err(StoreError::remote_write(status.as_u16(), body))
    }
}

/// Reads a response body for diagnostics, tolerating read failures.
async fn read_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => format!("[failed to read response body: {e}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_carry_service_identity() {
        let config = ClientConfig::new("http://localhost:54321/rest/v1/bookings", "svc-key");

        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("calsync/"));
    }

    #[test]
    fn client_builds_from_valid_config() {
        let config = ClientConfig::new("http://localhost:54321/rest/v1/bookings", "svc-key");
        assert!(DataApiClient::new(config).is_ok());
    }
}
