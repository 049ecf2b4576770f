//! Core domain types for the calsync booking synchronizer.
//!
//! Provides the booking row model, typed webhook payloads with up-front
//! validation, and the validation error type shared by the API and store
//! crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod models;

pub use error::{Result, ValidationError};
pub use events::{
    Attendee, BookingPayload, CancelPayload, SearchCriteria, TriggerEvent, WebhookEnvelope,
};
pub use models::{Booking, BookingStatus, BookingSummary, NewBooking};
