//! Booking row model for the remote bookings table.
//!
//! The remote data API is the sole owner of booking lifecycle; these types
//! only describe rows crossing the wire, never cached state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::events::BookingPayload;

/// Lifecycle markers written by this service.
///
/// A freshly created booking carries the provider-reported status verbatim
/// (for example `ACCEPTED`); these variants cover the transitions the
/// synchronizer itself performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// The booking was moved; its row points at the reschedule id.
    Rescheduled,
    /// The booking was cancelled; the row is kept, never deleted.
    Cancelled,
}

impl BookingStatus {
    /// Returns the status string stored in the `status` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rescheduled => "RESCHEDULED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row to insert into the bookings table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewBooking {
    /// External identifier issued by the scheduling provider.
    pub cal_event_id: String,
    /// Category label from the provider.
    pub appointment_type: Option<String>,
    /// Name of the first attendee, if any.
    pub patient_name: Option<String>,
    /// Contact (email) of the first attendee, if any.
    pub patient_contact: Option<String>,
    /// Calendar day of the appointment, truncated from `start_time`.
    pub appointment_time: NaiveDate,
    /// Provider-reported booking status.
    pub status: String,
    /// Appointment start.
    pub start_time: DateTime<Utc>,
    /// Appointment end.
    pub end_time: DateTime<Utc>,
    /// Last-write marker, stamped at insert time.
    pub modified_at: DateTime<Utc>,
}

impl NewBooking {
    /// Maps a validated provider payload into an insertable row.
    ///
    /// `appointment_time` is derived by truncating the start timestamp to
    /// its UTC calendar date; `modified_at` is stamped with `now`.
    pub fn from_payload(payload: &BookingPayload, now: DateTime<Utc>) -> Self {
        let first_attendee = payload.attendees.first();

        Self {
            cal_event_id: payload.uid.clone(),
            appointment_type: payload.appointment_type.clone(),
            patient_name: first_attendee.and_then(|a| a.name.clone()),
            patient_contact: first_attendee.and_then(|a| a.email.clone()),
            appointment_time: payload.start_time.date_naive(),
            status: payload.status.clone(),
            start_time: payload.start_time,
            end_time: payload.end_time,
            modified_at: now,
        }
    }
}

/// A booking row as returned by the remote data API.
///
/// Only the fields the service reads are modelled; unknown columns are
/// ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Booking {
    /// External identifier issued by the scheduling provider.
    pub cal_event_id: String,
    /// Category label from the provider.
    pub appointment_type: Option<String>,
    /// Appointment start.
    pub start_time: Option<DateTime<Utc>>,
    /// Appointment end.
    pub end_time: Option<DateTime<Utc>>,
}

/// Search result shape exposed to the webhook caller.
///
/// Deliberately narrower than the stored row: no patient name or contact
/// leaves the service through the search response.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    /// External identifier, reported back under the provider's field name.
    pub uid: String,
    /// Category label from the provider.
    pub appointment_type: Option<String>,
    /// Appointment start.
    pub start_time: Option<DateTime<Utc>>,
    /// Appointment end.
    pub end_time: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingSummary {
    fn from(row: Booking) -> Self {
        Self {
            uid: row.cal_event_id,
            appointment_type: row.appointment_type,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::events::Attendee;

    fn sample_payload() -> BookingPayload {
        BookingPayload {
            uid: "e1".to_string(),
            appointment_type: Some("consult".to_string()),
            attendees: vec![Attendee {
                name: Some("A".to_string()),
                email: Some("a@x.com".to_string()),
            }],
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
            status: "ACCEPTED".to_string(),
            reschedule_uid: None,
        }
    }

    #[test]
    fn appointment_time_truncates_start_to_calendar_date() {
        let now = Utc::now();
        let row = NewBooking::from_payload(&sample_payload(), now);

        assert_eq!(row.cal_event_id, "e1");
        assert_eq!(row.appointment_time, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(row.patient_name.as_deref(), Some("A"));
        assert_eq!(row.patient_contact.as_deref(), Some("a@x.com"));
        assert_eq!(row.status, "ACCEPTED");
        assert_eq!(row.modified_at, now);
    }

    #[test]
    fn missing_attendees_map_to_null_patient_fields() {
        let mut payload = sample_payload();
        payload.attendees.clear();

        let row = NewBooking::from_payload(&payload, Utc::now());

        assert_eq!(row.patient_name, None);
        assert_eq!(row.patient_contact, None);
    }

    #[test]
    fn summary_hides_patient_details() {
        let booking = Booking {
            cal_event_id: "e1".to_string(),
            appointment_type: Some("consult".to_string()),
            start_time: None,
            end_time: None,
        };

        let summary = BookingSummary::from(booking);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["uid"], "e1");
        assert!(json.get("patient_name").is_none());
        assert!(json.get("patient_contact").is_none());
    }

    #[test]
    fn status_strings_match_table_values() {
        assert_eq!(BookingStatus::Rescheduled.as_str(), "RESCHEDULED");
        assert_eq!(BookingStatus::Cancelled.to_string(), "CANCELLED");
    }
}
