//! Health endpoints for service monitoring.
//!
//! The service holds no state and owns no storage, so health is a cheap
//! process-level answer; orchestrators probing these endpoints never
//! trigger data API traffic.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use tracing::{debug, instrument};

/// Health check endpoint handler.
#[instrument(name = "health_check")]
pub async fn health_check() -> impl IntoResponse {
    debug!("performing health check");

    let response = serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, Json(response))
}

/// Liveness check endpoint for orchestration probes.
///
/// Minimal check that the HTTP server is responding; tests no external
/// dependencies.
#[instrument(name = "liveness_check")]
pub async fn liveness_check() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "alive",
        "timestamp": Utc::now(),
        "service": "calsync-api",
    });

    (StatusCode::OK, Json(response))
}
