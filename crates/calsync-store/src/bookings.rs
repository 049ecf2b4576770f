//! Booking operations against the remote bookings table.
//!
//! Each operation is a single data API call, except reschedule which is a
//! fixed two-step sequence. Failures from every step propagate; nothing is
//! logged-and-swallowed.

use calsync_core::{
    BookingPayload, BookingStatus, BookingSummary, CancelPayload, NewBooking, SearchCriteria,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    client::DataApiClient,
    error::{Result, StoreError},
    filter,
};

/// Partial row update for lifecycle transitions.
///
/// Only the touched columns are serialized so the data API leaves the rest
/// of the row intact.
#[derive(Debug, Serialize)]
struct BookingTransition<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cal_event_id: Option<&'a str>,
    modified_at: DateTime<Utc>,
}

/// Booking store backed by the remote data API.
///
/// Stateless: every method performs its calls and returns; no booking state
/// is held between requests.
#[derive(Debug, Clone)]
pub struct BookingStore {
    client: DataApiClient,
}

impl BookingStore {
    /// Creates a store around an existing data API client.
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    /// Inserts a new booking row from a validated provider payload.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteWrite` when the data API rejects the
    /// insert, or a transport error when it is unreachable.
    #[instrument(skip(self, payload), fields(uid = %payload.uid))]
    pub async fn create(&self, payload: &BookingPayload) -> Result<()> {
        let row = NewBooking::from_payload(payload, Utc::now());
        self.client.insert(&row).await?;

        info!(uid = %payload.uid, "booking created");
        Ok(())
    }

    /// Reschedules a booking: retargets the old row, then inserts the new
    /// instance.
    ///
    /// The existing row matched by the original id gets status
    /// `RESCHEDULED`, its external id reassigned to `reschedule_uid`, and a
    /// fresh `modified_at`; the full payload is then inserted as a new row.
    /// Both steps are attempted in order and a failure in either aborts the
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteWrite` when either the update or the
    /// insert is rejected, or a transport error when the data API is
    /// unreachable.
    #[instrument(skip(self, payload), fields(uid = %payload.uid))]
    pub async fn reschedule(&self, payload: &BookingPayload, reschedule_uid: &str) -> Result<()> {
        let transition = BookingTransition {
            status: BookingStatus::Rescheduled.as_str(),
            cal_event_id: Some(reschedule_uid),
            modified_at: Utc::now(),
        };

        let query = filter::eq_query("cal_event_id", &payload.uid);
        self.client.update_where(&query, &transition).await?;

        self.create(payload).await?;

        info!(uid = %payload.uid, reschedule_uid, "booking rescheduled");
        Ok(())
    }

    /// Cancels a booking: marks the row matched by the external id.
    ///
    /// The row is kept, never deleted. Matching zero rows is a remote
    /// success, so repeated cancels for the same id succeed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteWrite` when the data API rejects the
    /// update, or a transport error when it is unreachable.
    #[instrument(skip(self, payload), fields(uid = %payload.uid))]
    pub async fn cancel(&self, payload: &CancelPayload) -> Result<()> {
        let transition = BookingTransition {
            status: BookingStatus::Cancelled.as_str(),
            cal_event_id: None,
            modified_at: Utc::now(),
        };

        let query = filter::eq_query("cal_event_id", &payload.uid);
        self.client.update_where(&query, &transition).await?;

        info!(uid = %payload.uid, "booking cancelled");
        Ok(())
    }

    /// Searches bookings matching any of the supplied criteria.
    ///
    /// Criteria are validated before this point; rows come back reshaped to
    /// the narrow summary form.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RemoteRead` when the data API rejects the
    /// query, or a transport error when it is unreachable.
    #[instrument(skip(self, criteria))]
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<BookingSummary>> {
        let Some(expression) = filter::or_expression(criteria) else {
            return Err(StoreError::configuration("search invoked without criteria"));
        };

        let rows = self.client.select::<calsync_core::Booking>(&expression).await?;

        Ok(rows.into_iter().map(BookingSummary::from).collect())
    }
}
