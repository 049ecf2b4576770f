//! HTTP surface for the calsync booking synchronizer.
//!
//! Wires the webhook dispatcher, request authentication, health endpoints,
//! and server bootstrap around the booking store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use calsync_store::BookingStore;

pub mod auth;
pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server};

/// Shared application state for request handlers.
///
/// Cheap to clone; the store shares one connection pool and the secret is
/// reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Booking store backed by the remote data API.
    pub store: BookingStore,
    /// Shared secret for webhook authentication (token and signature).
    pub webhook_secret: Arc<str>,
}

impl AppState {
    /// Creates application state from a store and the webhook secret.
    pub fn new(store: BookingStore, webhook_secret: impl Into<Arc<str>>) -> Self {
        Self { store, webhook_secret: webhook_secret.into() }
    }
}
