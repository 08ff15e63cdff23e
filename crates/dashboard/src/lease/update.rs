//! Turns an update submission into the change set sent to the reservation
//! service. Only the fields that actually change are sent; a submission
//! that changes nothing produces no remote call at all.

use chrono::Duration;
use serde_json::{json, Map, Value};

use super::ValidationFailure;
use crate::web::api::UpdateLeaseBlob;
use models::{Lease, LEASE_DATE_FORMAT};

/// Builds the change set for one update submission against the lease's
/// current state. Returns `Ok(None)` when the submission is a no-op.
///
/// `prolong_for` and `reduce_by` are relative adjustments to the current
/// end date; when both are given, the prolongation wins.
pub fn build_update_changes(
    current: &Lease,
    input: &UpdateLeaseBlob,
) -> Result<Option<Value>, ValidationFailure> {
    let mut changes = Map::new();

    if let Some(name) = blank_to_none(&input.name) {
        if name != current.name {
            changes.insert("name".to_string(), json!(name));
        }
    }

    let shift = match (
        blank_to_none(&input.prolong_for),
        blank_to_none(&input.reduce_by),
    ) {
        (Some(raw), _) => Some(parse_duration(raw)?),
        (None, Some(raw)) => Some(-parse_duration(raw)?),
        (None, None) => None,
    };
    if let Some(shift) = shift {
        if !shift.is_zero() {
            let end = current.end_date + shift;
            changes.insert(
                "end_date".to_string(),
                json!(end.format(LEASE_DATE_FORMAT).to_string()),
            );
        }
    }

    if changes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Object(changes)))
    }
}

/// Parses durations like `30m`, `2h`, `1d`, `90s`. A bare number counts
/// as seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, ValidationFailure> {
    let raw = raw.trim();
    let malformed = || ValidationFailure::UnparsableDuration(raw.to_string());

    let (digits, unit) = match raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((split, _)) => raw.split_at(split),
        None => (raw, "s"),
    };
    let count: i64 = digits.parse().map_err(|_| malformed())?;

    match unit {
        "s" => Ok(Duration::seconds(count)),
        "m" => Ok(Duration::minutes(count)),
        "h" => Ok(Duration::hours(count)),
        "d" => Ok(Duration::days(count)),
        _ => Err(malformed()),
    }
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
