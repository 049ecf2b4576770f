//! Disjunctive filter expressions for data API reads.
//!
//! Criteria are serialized into the data API's `or(field.op.value,...)`
//! query syntax. Field operators are fixed per column: exact match (`eq`)
//! for identifiers, contacts and timestamps, case-insensitive substring
//! match (`ilike`) for patient names. Every user-supplied value is
//! percent-encoded so reserved expression characters (commas, parentheses,
//! dots) cannot break out of their operand position.

use calsync_core::SearchCriteria;
use urlencoding::encode;

/// Builds the inner `field.op.value` list for a disjunctive filter.
///
/// Empty-valued criteria are skipped. Returns `None` when no criterion
/// contributes a clause; callers validate criteria before reaching this
/// point, so `None` indicates a caller bug rather than user input.
pub fn or_expression(criteria: &SearchCriteria) -> Option<String> {
    let mut clauses = Vec::new();

    if let Some(uid) = non_empty(criteria.uid.as_deref()) {
        clauses.push(format!("cal_event_id.eq.{}", encode(uid)));
    }

    if let Some(name) = non_empty(criteria.patient_name.as_deref()) {
        clauses.push(format!("patient_name.ilike.*{}*", encode(name)));
    }

    if let Some(contact) = non_empty(criteria.patient_contact.as_deref()) {
        clauses.push(format!("patient_contact.eq.{}", encode(contact)));
    }

    if let Some(start) = non_empty(criteria.start_time.as_deref()) {
        clauses.push(format!("start_time.eq.{}", encode(start)));
    }

    if let Some(end) = non_empty(criteria.end_time.as_deref()) {
        clauses.push(format!("end_time.eq.{}", encode(end)));
    }

    if clauses.is_empty() {
        return None;
    }

    Some(format!("({})", clauses.join(",")))
}

/// Builds an `field=eq.value` query string for targeted updates.
///
/// Used by reschedule and cancel to address the single row matching an
/// external id. The value is percent-encoded like filter operands.
pub fn eq_query(field: &str, value: &str) -> String {
    format!("{field}=eq.{}", encode(value))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
