//! Webhook dispatcher: authentication, payload validation, and routing to
//! booking operations.
//!
//! Control flow per request: read raw body, authenticate (token OR
//! signature), parse the typed envelope, dispatch on the trigger event,
//! and translate the operation result into the JSON status response. Every
//! code path returns well-formed JSON.
//!
//! Status mapping, preserved from the upstream contract:
//! - unauthorized -> 401
//! - successful create/reschedule/cancel -> 200 `{ok:true}`
//! - remote-rejected create/reschedule/cancel -> 200 `{ok:false}`
//! - successful search -> 200 `{ok:true, body}`
//! - failed search -> 500 `{ok:false}`
//! - validation failure -> 400 `{ok:false, error}`
//! - transport or internal failure -> 500 `{ok:false, error:"Internal error"}`

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use calsync_core::{
    BookingPayload, CancelPayload, SearchCriteria, TriggerEvent, ValidationError, WebhookEnvelope,
};
use calsync_store::StoreError;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{auth, AppState};

/// Response body for every webhook outcome.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the requested operation succeeded.
    pub ok: bool,
    /// Human-readable error description, when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// JSON-serialized search results, for booking queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl WebhookResponse {
    fn ok() -> Self {
        Self { ok: true, error: None, body: None }
    }

    fn failed() -> Self {
        Self { ok: false, error: None, body: None }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { ok: false, error: Some(message.into()), body: None }
    }

    fn with_body(body: String) -> Self {
        Self { ok: true, error: None, body: Some(body) }
    }
}

/// Handles an inbound scheduling-provider webhook.
///
/// Authentication runs against the raw body before any parsing; an
/// unauthorized request is rejected without touching the payload or the
/// data API.
#[instrument(name = "handle_webhook", skip(state, headers, body))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !auth::authorize_request(&headers, &body, &state.webhook_secret) {
        warn!("rejecting unauthenticated webhook");
        return (StatusCode::UNAUTHORIZED, Json(WebhookResponse::error("Unauthorized Access")))
            .into_response();
    }

    let envelope = match WebhookEnvelope::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => return validation_failure(&e),
    };

    info!(trigger_event = ?envelope.trigger_event, "dispatching webhook");

    match envelope.trigger_event {
        TriggerEvent::BookingCreated => create(&state, envelope.payload).await,
        TriggerEvent::BookingRescheduled => reschedule(&state, envelope.payload).await,
        TriggerEvent::BookingCancelled => cancel(&state, envelope.payload).await,
        TriggerEvent::GetBookings => search(&state, envelope.payload).await,
        TriggerEvent::Unknown => {
            // Acknowledged without action: new provider event types must not
            // bounce deliveries.
            warn!("unrecognized trigger event, acknowledging without action");
            (StatusCode::OK, Json(WebhookResponse::ok())).into_response()
        },
    }
}

async fn create(state: &AppState, payload: serde_json::Value) -> Response {
    let payload = match BookingPayload::from_value(payload) {
        Ok(payload) => payload,
        Err(e) => return validation_failure(&e),
    };

    match state.store.create(&payload).await {
        Ok(()) => (StatusCode::OK, Json(WebhookResponse::ok())).into_response(),
        Err(e) => write_failure(&e),
    }
}

async fn reschedule(state: &AppState, payload: serde_json::Value) -> Response {
    let payload = match BookingPayload::from_value(payload) {
        Ok(payload) => payload,
        Err(e) => return validation_failure(&e),
    };

    let reschedule_uid = match payload.require_reschedule_uid() {
        Ok(uid) => uid.to_string(),
        Err(e) => return validation_failure(&e),
    };

    match state.store.reschedule(&payload, &reschedule_uid).await {
        Ok(()) => (StatusCode::OK, Json(WebhookResponse::ok())).into_response(),
        Err(e) => write_failure(&e),
    }
}

async fn cancel(state: &AppState, payload: serde_json::Value) -> Response {
    let payload = match CancelPayload::from_value(payload) {
        Ok(payload) => payload,
        Err(e) => return validation_failure(&e),
    };

    match state.store.cancel(&payload).await {
        Ok(()) => (StatusCode::OK, Json(WebhookResponse::ok())).into_response(),
        Err(e) => write_failure(&e),
    }
}

async fn search(state: &AppState, payload: serde_json::Value) -> Response {
    let criteria = match SearchCriteria::from_value(payload) {
        Ok(criteria) => criteria,
        Err(e) => return validation_failure(&e),
    };

    let results = match state.store.search(&criteria).await {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, "booking search failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(WebhookResponse::failed()))
                .into_response();
        },
    };

    let body = match serde_json::to_string(&results) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "failed to serialize search results");
            return internal_failure();
        },
    };

    (StatusCode::OK, Json(WebhookResponse::with_body(body))).into_response()
}

/// Maps a validation failure to a 400 response naming the problem.
fn validation_failure(error: &ValidationError) -> Response {
    warn!(error = %error, "rejecting invalid payload");
    (StatusCode::BAD_REQUEST, Json(WebhookResponse::error(error.to_string()))).into_response()
}

/// Maps a booking mutation failure to its response.
///
/// Remote-reported rejections keep the legacy 200 `{ok:false}` shape the
/// provider expects; transport and decoding failures are internal errors.
fn write_failure(error: &StoreError) -> Response {
    match error {
        StoreError::RemoteWrite { status, body } => {
            error!(status = *status, body = %body, "data API rejected booking write");
            (StatusCode::OK, Json(WebhookResponse::failed())).into_response()
        },
        other => {
            error!(error = %other, "booking write failed");
            internal_failure()
        },
    }
}

/// Generic 500 that never leaks internal details to the caller.
pub(crate) fn internal_failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(WebhookResponse::error("Internal error")))
        .into_response()
}
