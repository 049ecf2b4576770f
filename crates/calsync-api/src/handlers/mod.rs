//! HTTP request handlers.

pub mod health;
pub mod webhook;

pub use health::{health_check, liveness_check};
pub use webhook::handle_webhook;
