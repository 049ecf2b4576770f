//! calsync: scheduling-webhook to data-API booking synchronizer.
//!
//! Main entry point. Initializes tracing, loads configuration, constructs
//! the data API client, and serves the webhook endpoint until shutdown.

use std::time::Duration;

use anyhow::{Context, Result};
use calsync_api::{AppState, Config};
use calsync_store::{BookingStore, DataApiClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting calsync booking synchronizer");

    let config = Config::load()?;
    info!(
        data_api_url = %config.data_api_url,
        service_key = %Config::masked_credential(&config.service_role_key),
        webhook_secret = %Config::masked_credential(&config.cal_webhook_secret),
        host = %config.host,
        port = config.port,
        "Configuration loaded"
    );

    let client =
        DataApiClient::new(config.to_client_config()).context("Failed to build data API client")?;
    let store = BookingStore::new(client);
    let state = AppState::new(store, config.cal_webhook_secret.as_str());

    let addr = config.parse_server_addr()?;
    info!(addr = %addr, "calsync is ready to receive webhooks");

    calsync_api::start_server(state, addr, Duration::from_secs(config.request_timeout))
        .await
        .context("Server failed")?;

    info!("calsync shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,calsync=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
