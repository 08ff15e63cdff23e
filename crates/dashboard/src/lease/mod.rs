//! Lease-request intake: normalizes the raw form input to UTC instants,
//! checks the temporal and availability invariants, and produces the
//! validated request the reservation service call is built from.
//!
//! Everything here is advisory. The remote create call remains the
//! authority; a race that slips past these checks surfaces as a normal
//! remote-side rejection.

pub mod update;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use itertools::Itertools;
use serde_json::{json, Value};
use thiserror::Error;

use crate::availability::{AvailabilityChecker, AvailabilityError};
use crate::web::api::LeaseFormBlob;
use client::{ClientError, ReservationApi};
use models::LeaseRequest;

/// One reason a lease request was turned away. Failures are collected, not
/// short-circuited, so the user sees everything wrong with the submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    #[error("start ({start}) must be strictly before end ({end})")]
    TemporalOrder {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("start ({start}) is in the past")]
    PastStart { start: DateTime<Utc> },

    #[error("lease name must not be empty")]
    EmptyName,

    #[error("a lease named `{0}` already exists")]
    DuplicateName(String),

    #[error("host count range is invalid: min {min}, max {max}")]
    InvalidHostRange { min: u32, max: u32 },

    #[error("unrecognized {field} date `{value}`, expected YYYY-MM-DD")]
    UnparsableDate { field: &'static str, value: String },

    #[error("unrecognized {field} time `{value}`, expected HH:MM")]
    UnparsableTime { field: &'static str, value: String },

    #[error("{field} falls inside a daylight-saving gap and does not exist locally")]
    SkippedLocalTime { field: &'static str },

    #[error("only {available} host(s) free in the requested window, need at least {requested}")]
    InsufficientHosts { requested: u32, available: u64 },

    #[error("unrecognized duration `{0}`, expected <number><s|m|h|d>")]
    UnparsableDuration(String),
}

/// Intake failure: either the request itself was rejected, or one of the
/// advisory lookups could not run at all.
#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("lease request rejected: {}", .0.iter().join("; "))]
    Rejected(Vec<ValidationFailure>),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

pub struct LeaseValidator<'a> {
    client: &'a dyn ReservationApi,
    availability: &'a dyn AvailabilityChecker,
}

impl<'a> LeaseValidator<'a> {
    pub fn new(client: &'a dyn ReservationApi, availability: &'a dyn AvailabilityChecker) -> Self {
        Self {
            client,
            availability,
        }
    }

    /// Validates one submission against `now`, with the submitter's
    /// timezone passed in explicitly. All comparisons and the resulting
    /// request are UTC.
    ///
    /// The availability gate only runs once the window itself is valid;
    /// an unreachable availability backend surfaces as
    /// [`LeaseError::Availability`], never as zero free hosts.
    pub async fn validate(
        &self,
        blob: &LeaseFormBlob,
        now: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<LeaseRequest, LeaseError> {
        let mut failures = Vec::new();

        let start = combine_date_time(
            &blob.start_date,
            &blob.start_time,
            "start",
            now,
            timezone,
        );
        let end = combine_date_time(
            &blob.end_date,
            &blob.end_time,
            "end",
            now + Duration::days(1),
            timezone,
        );

        let window_valid = match (&start, &end) {
            (Ok(start), Ok(end)) => {
                let mut ok = true;
                if start >= end {
                    failures.push(ValidationFailure::TemporalOrder {
                        start: *start,
                        end: *end,
                    });
                    ok = false;
                }
                if *start < now {
                    failures.push(ValidationFailure::PastStart { start: *start });
                    ok = false;
                }
                ok
            }
            _ => false,
        };
        if let Err(f) = &start {
            failures.push(f.clone());
        }
        if let Err(f) = &end {
            failures.push(f.clone());
        }

        if blob.min_hosts < 1 || blob.min_hosts > blob.max_hosts {
            failures.push(ValidationFailure::InvalidHostRange {
                min: blob.min_hosts,
                max: blob.max_hosts,
            });
        }

        if blob.name.trim().is_empty() {
            failures.push(ValidationFailure::EmptyName);
        }

        let existing = self.client.list_leases().await?;
        if existing.iter().any(|lease| lease.name == blob.name) {
            failures.push(ValidationFailure::DuplicateName(blob.name.clone()));
        }

        let node_uid = non_blank(&blob.node_uid);
        let node_type = non_blank(&blob.node_type);

        // The availability check is only meaningful for a valid window.
        if window_valid {
            let (start, end) = (start.clone().unwrap(), end.clone().unwrap());
            let window = models::TimeWindow::new(start, end);
            let available = self.availability.available_count(node_type, window).await?;
            if available < u64::from(blob.min_hosts) {
                failures.push(ValidationFailure::InsufficientHosts {
                    requested: blob.min_hosts,
                    available,
                });
            }
        }

        if !failures.is_empty() {
            return Err(LeaseError::Rejected(failures));
        }

        // Both parses succeeded or we would have bailed above.
        let (start, end) = (start.unwrap(), end.unwrap());
        Ok(LeaseRequest {
            name: blob.name.clone(),
            start,
            end,
            host_count_min: blob.min_hosts,
            host_count_max: blob.max_hosts,
            resource_properties: resource_predicate(node_uid, node_type),
        })
    }
}

/// Combines separately entered date and time fields into one UTC instant.
///
/// A fully blank pair yields `default`; a present date with a blank time
/// reads as local midnight. Ambiguous local times (clocks rolling back)
/// resolve to the earlier instant.
fn combine_date_time(
    date: &str,
    time: &str,
    field: &'static str,
    default: DateTime<Utc>,
    timezone: Tz,
) -> Result<DateTime<Utc>, ValidationFailure> {
    let date = date.trim();
    let time = time.trim();

    if date.is_empty() && time.is_empty() {
        return Ok(default);
    }

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        ValidationFailure::UnparsableDate {
            field,
            value: date.to_string(),
        }
    })?;

    let time = if time.is_empty() {
        NaiveTime::MIN
    } else {
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| ValidationFailure::UnparsableTime {
            field,
            value: time.to_string(),
        })?
    };

    timezone
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or(ValidationFailure::SkippedLocalTime { field })
}

/// Resolution order for the host predicate: a specific node wins over a
/// node type, which wins over no predicate at all.
fn resource_predicate(node_uid: Option<&str>, node_type: Option<&str>) -> Option<Value> {
    match (node_uid, node_type) {
        (Some(uid), _) => Some(json!(["==", "$uid", uid])),
        (None, Some(ty)) => Some(json!(["==", "$node_type", ty])),
        (None, None) => None,
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
