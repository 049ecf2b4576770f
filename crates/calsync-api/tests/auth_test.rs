//! Integration tests for webhook authentication.
//!
//! Exercises the token and signature mechanisms through the full router
//! and verifies that unauthenticated requests never reach the data API.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use calsync_api::{auth, create_router, AppState};
use calsync_store::{BookingStore, ClientConfig, DataApiClient};
use tower::ServiceExt;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

const SECRET: &str = "whsec_test";

fn app_for(server: &MockServer) -> Router {
    let config = ClientConfig::new(format!("{}/rest/v1/bookings", server.uri()), "svc-key");
    let client = DataApiClient::new(config).expect("client should build");
    let state = AppState::new(BookingStore::new(client), SECRET);
    create_router(state, Duration::from_secs(5))
}

fn create_body() -> String {
    serde_json::json!({
        "triggerEvent": "BOOKING_CREATED",
        "payload": {
            "uid": "e1",
            "type": "consult",
            "attendees": [{"name": "A", "email": "a@x.com"}],
            "startTime": "2024-05-01T10:00:00Z",
            "endTime": "2024-05-01T10:30:00Z",
            "status": "ACCEPTED"
        }
    })
    .to_string()
}

#[tokio::test]
async fn request_without_credentials_is_rejected_before_any_write() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(create_body()))
        .expect("request build");

    let response = app_for(&server).oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Unauthorized Access");
}

#[tokio::test]
async fn bearer_token_alone_is_sufficient() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(1).mount(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(AUTHORIZATION, format!("Bearer {SECRET}"))
        .header("content-type", "application/json")
        .body(Body::from(create_body()))
        .expect("request build");

    let response = app_for(&server).oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bare_token_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).mount(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(AUTHORIZATION, SECRET)
        .body(Body::from(create_body()))
        .expect("request build");

    let response = app_for(&server).oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn hmac_signature_alone_is_sufficient() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(1).mount(&server).await;

    let body = create_body();
    let signature =
        auth::generate_hmac_hex(body.as_bytes(), SECRET).expect("signature generation");

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(auth::SIGNATURE_HEADER, signature)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request build");

    let response = app_for(&server).oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_body_with_stale_signature_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    // Sign one body, deliver another: the digest is recomputed over the
    // received bytes, so the stale header must not validate.
    let signature =
        auth::generate_hmac_hex(create_body().as_bytes(), SECRET).expect("signature generation");

    let tampered = serde_json::json!({
        "triggerEvent": "BOOKING_CANCELLED",
        "payload": {"uid": "e1"}
    })
    .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(auth::SIGNATURE_HEADER, signature)
        .body(Body::from(tampered))
        .expect("request build");

    let response = app_for(&server).oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_with_wrong_signature_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(AUTHORIZATION, "Bearer not-the-secret")
        .header(auth::SIGNATURE_HEADER, "deadbeef")
        .body(Body::from(create_body()))
        .expect("request build");

    let response = app_for(&server).oneshot(request).await.expect("request execution");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
