//! Typed webhook envelope and payload parsing.
//!
//! The provider delivers a JSON body with a `triggerEvent` discriminator and
//! a nested `payload` object. Parsing is done up front into typed values so
//! business logic never reaches into untyped JSON; every shape problem
//! surfaces as a [`ValidationError`] before any remote call.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Result, ValidationError};

/// Booking lifecycle transitions recognized by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerEvent {
    /// A new booking was made with the provider.
    BookingCreated,
    /// An existing booking was moved; the payload carries both ids.
    BookingRescheduled,
    /// An existing booking was cancelled.
    BookingCancelled,
    /// Query for bookings matching the payload criteria.
    GetBookings,
    /// Any discriminator this service does not recognize.
    #[serde(other)]
    Unknown,
}

/// Top-level webhook body: discriminator plus event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    /// Which booking lifecycle transition occurred.
    #[serde(rename = "triggerEvent")]
    pub trigger_event: TriggerEvent,
    /// Event-specific payload, parsed per operation.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WebhookEnvelope {
    /// Parses the raw request body into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedBody`] when the body is not valid
    /// JSON or lacks the `triggerEvent` discriminator.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
    }
}

/// A single attendee entry from the provider payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Attendee {
    /// Attendee display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Attendee contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload for booking creation and reschedule events.
///
/// The same shape serves both: a reschedule delivers the full new booking
/// plus `rescheduleUid`, the provider-issued id of the fresh instance.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// External identifier of the booking this event refers to.
    pub uid: String,
    /// Category label from the provider.
    #[serde(rename = "type", default)]
    pub appointment_type: Option<String>,
    /// Attendees; only the first is synchronized.
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Appointment start.
    pub start_time: DateTime<Utc>,
    /// Appointment end.
    pub end_time: DateTime<Utc>,
    /// Provider-reported booking status.
    pub status: String,
    /// New id issued on reschedule; required for reschedule events only.
    #[serde(default)]
    pub reschedule_uid: Option<String>,
}

impl BookingPayload {
    /// Parses and validates a create/reschedule payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the payload does not match the
    /// expected shape or `uid` is empty.
    pub fn from_value(payload: serde_json::Value) -> Result<Self> {
        let parsed: Self = serde_json::from_value(payload)
            .map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;

        if parsed.uid.is_empty() {
            return Err(ValidationError::EmptyField("uid"));
        }

        Ok(parsed)
    }

    /// Returns the reschedule id, validating presence for reschedule events.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `rescheduleUid` is missing or
    /// empty.
    pub fn require_reschedule_uid(&self) -> Result<&str> {
        match self.reschedule_uid.as_deref() {
            Some(uid) if !uid.is_empty() => Ok(uid),
            Some(_) => Err(ValidationError::EmptyField("rescheduleUid")),
            None => Err(ValidationError::InvalidPayload(
                "rescheduleUid is required for reschedule events".to_string(),
            )),
        }
    }
}

/// Payload for booking cancellation: only the external id matters.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CancelPayload {
    /// External identifier of the booking to cancel.
    pub uid: String,
}

impl CancelPayload {
    /// Parses and validates a cancel payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `uid` is missing or empty.
    pub fn from_value(payload: serde_json::Value) -> Result<Self> {
        let parsed: Self = serde_json::from_value(payload)
            .map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;

        if parsed.uid.is_empty() {
            return Err(ValidationError::EmptyField("uid"));
        }

        Ok(parsed)
    }
}

/// Search criteria for booking queries.
///
/// Any subset may be supplied; at least one criterion is required. Time
/// bounds are kept as opaque strings and matched exactly against the stored
/// timestamps.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Exact match on the external booking id.
    #[serde(default)]
    pub uid: Option<String>,
    /// Case-insensitive substring match on the patient name.
    #[serde(default)]
    pub patient_name: Option<String>,
    /// Exact match on the patient contact.
    #[serde(default)]
    pub patient_contact: Option<String>,
    /// Exact match on the start timestamp.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Exact match on the end timestamp.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl SearchCriteria {
    /// Parses and validates search criteria.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCriteria`] when no criterion is
    /// supplied, before any network call is made.
    pub fn from_value(payload: serde_json::Value) -> Result<Self> {
        let parsed: Self = serde_json::from_value(payload)
            .map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;

        if parsed.is_empty() {
            return Err(ValidationError::MissingCriteria);
        }

        Ok(parsed)
    }

    /// Returns true when no criterion carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        [
            &self.uid,
            &self.patient_name,
            &self.patient_contact,
            &self.start_time,
            &self.end_time,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_parses_known_trigger_events() {
        let body = br#"{"triggerEvent":"BOOKING_CREATED","payload":{"uid":"e1"}}"#;
        let envelope = WebhookEnvelope::from_slice(body).unwrap();
        assert_eq!(envelope.trigger_event, TriggerEvent::BookingCreated);
    }

    #[test]
    fn envelope_maps_unrecognized_discriminator_to_unknown() {
        let body = br#"{"triggerEvent":"MEETING_ENDED","payload":{}}"#;
        let envelope = WebhookEnvelope::from_slice(body).unwrap();
        assert_eq!(envelope.trigger_event, TriggerEvent::Unknown);
    }

    #[test]
    fn envelope_rejects_invalid_json() {
        let err = WebhookEnvelope::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedBody(_)));
    }

    #[test]
    fn booking_payload_parses_provider_fields() {
        let payload = json!({
            "uid": "e1",
            "type": "consult",
            "attendees": [{"name": "A", "email": "a@x.com"}],
            "startTime": "2024-05-01T10:00:00Z",
            "endTime": "2024-05-01T10:30:00Z",
            "status": "ACCEPTED"
        });

        let parsed = BookingPayload::from_value(payload).unwrap();
        assert_eq!(parsed.uid, "e1");
        assert_eq!(parsed.appointment_type.as_deref(), Some("consult"));
        assert_eq!(parsed.attendees[0].email.as_deref(), Some("a@x.com"));
        assert_eq!(parsed.reschedule_uid, None);
    }

    #[test]
    fn booking_payload_rejects_empty_uid() {
        let payload = json!({
            "uid": "",
            "startTime": "2024-05-01T10:00:00Z",
            "endTime": "2024-05-01T10:30:00Z",
            "status": "ACCEPTED"
        });

        assert_eq!(
            BookingPayload::from_value(payload).unwrap_err(),
            ValidationError::EmptyField("uid")
        );
    }

    #[test]
    fn booking_payload_rejects_missing_timestamps() {
        let payload = json!({"uid": "e1", "status": "ACCEPTED"});
        let err = BookingPayload::from_value(payload).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPayload(_)));
    }

    #[test]
    fn reschedule_uid_is_required_for_reschedules() {
        let payload = json!({
            "uid": "old1",
            "rescheduleUid": "new1",
            "startTime": "2024-05-02T10:00:00Z",
            "endTime": "2024-05-02T10:30:00Z",
            "status": "ACCEPTED"
        });

        let parsed = BookingPayload::from_value(payload).unwrap();
        assert_eq!(parsed.require_reschedule_uid().unwrap(), "new1");

        let without = json!({
            "uid": "old1",
            "startTime": "2024-05-02T10:00:00Z",
            "endTime": "2024-05-02T10:30:00Z",
            "status": "ACCEPTED"
        });
        let parsed = BookingPayload::from_value(without).unwrap();
        assert!(parsed.require_reschedule_uid().is_err());
    }

    #[test]
    fn cancel_payload_requires_uid() {
        assert!(CancelPayload::from_value(json!({"uid": "e1"})).is_ok());
        assert!(CancelPayload::from_value(json!({})).is_err());
        assert_eq!(
            CancelPayload::from_value(json!({"uid": ""})).unwrap_err(),
            ValidationError::EmptyField("uid")
        );
    }

    #[test]
    fn search_criteria_require_at_least_one_field() {
        assert_eq!(
            SearchCriteria::from_value(json!({})).unwrap_err(),
            ValidationError::MissingCriteria
        );
        assert_eq!(
            SearchCriteria::from_value(json!({"patient_name": ""})).unwrap_err(),
            ValidationError::MissingCriteria
        );

        let criteria = SearchCriteria::from_value(json!({"patient_name": "Jo"})).unwrap();
        assert_eq!(criteria.patient_name.as_deref(), Some("Jo"));
    }
}
