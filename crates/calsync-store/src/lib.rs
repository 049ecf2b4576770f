//! Data API client and booking operations.
//!
//! Talks to the relational data API's bookings table over REST: inserts for
//! created bookings, query-string-filtered updates for lifecycle
//! transitions, and disjunctive filter reads for searches.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bookings;
pub mod client;
pub mod error;
pub mod filter;

pub use bookings::BookingStore;
pub use client::{ClientConfig, DataApiClient};
pub use error::{Result, StoreError};
