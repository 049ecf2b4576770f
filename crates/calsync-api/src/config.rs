//! Configuration for the calsync service.
//!
//! Loaded once at process start and passed into the handlers explicitly;
//! business logic never reads the process environment.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use calsync_store::ClientConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The webhook shared secret, service credential, and data API URL have no
/// defaults; loading fails fast when they are absent instead of proceeding
/// with undefined behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Secrets and upstream
    /// Shared secret used by the scheduling provider to authenticate
    /// webhooks (token and HMAC signature).
    ///
    /// Environment variable: `CAL_WEBHOOK_SECRET`
    #[serde(default, alias = "CAL_WEBHOOK_SECRET")]
    pub cal_webhook_secret: String,
    /// Service credential authorized to write to the bookings table.
    /// Distinct from the webhook secret.
    ///
    /// Environment variable: `SERVICE_ROLE_KEY`
    #[serde(default, alias = "SERVICE_ROLE_KEY")]
    pub service_role_key: String,
    /// Fully qualified URL of the bookings table resource.
    ///
    /// Environment variable: `DATA_API_URL`
    #[serde(default, alias = "DATA_API_URL")]
    pub data_api_url: String,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// Inbound HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Outbound
    /// Timeout for data API calls in seconds.
    ///
    /// Environment variable: `UPSTREAM_TIMEOUT`
    #[serde(default = "default_upstream_timeout", alias = "UPSTREAM_TIMEOUT")]
    pub upstream_timeout: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// # Errors
    ///
    /// Fails when extraction fails or required values (webhook secret,
    /// service credential, data API URL) are missing.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the store crate's client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new(&self.data_api_url, &self.service_role_key);
        client.timeout = Duration::from_secs(self.upstream_timeout);
        client
    }

    /// Parse server socket address from host and port configuration.
    ///
    /// # Errors
    ///
    /// Fails when host and port do not form a valid socket address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Masks a credential for logging, keeping only its length visible.
    pub fn masked_credential(value: &str) -> String {
        format!("***({} chars)", value.len())
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.cal_webhook_secret.is_empty() {
            anyhow::bail!("CAL_WEBHOOK_SECRET must be set");
        }

        if self.service_role_key.is_empty() {
            anyhow::bail!("SERVICE_ROLE_KEY must be set");
        }

        if self.data_api_url.is_empty() {
            anyhow::bail!("DATA_API_URL must be set");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 || self.upstream_timeout == 0 {
            anyhow::bail!("timeouts must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cal_webhook_secret: String::new(),
            service_role_key: String::new(),
            data_api_url: String::new(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            upstream_timeout: default_upstream_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_upstream_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}
