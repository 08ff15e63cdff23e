use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::window::TimeWindow;

/// Wire format for lease start/end dates, as the dashboard has always sent
/// them to the reservation service.
pub const LEASE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A lease as returned by the reservation service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Lease {
    pub id: String,
    pub name: String,
    #[serde(with = "lease_date")]
    #[schemars(with = "String")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "lease_date")]
    #[schemars(with = "String")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_reason: Option<String>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Lease {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_date, self.end_date)
    }
}

/// One reservation inside a lease, as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Reservation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub spec: ReservationSpec,
}

/// A reservation descriptor submitted as part of a lease create call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReservationSpec {
    pub min: u32,
    pub max: u32,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_properties: Option<Value>,
}

/// An event attached to a lease (e.g. `before_end_notification`). The
/// service defines the event vocabulary; we pass the fields through.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    pub event_type: String,
    #[serde(flatten)]
    pub details: HashMap<String, Value>,
}

/// A fully validated lease-create request. Built transiently per submission,
/// translated into one remote create call, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaseRequest {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub host_count_min: u32,
    pub host_count_max: u32,
    /// Equality predicate narrowing which hosts qualify, in the service's
    /// `["==", "$key", "value"]` filter syntax. `None` means any host.
    pub resource_properties: Option<Value>,
}

impl LeaseRequest {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// The reservation list for the outgoing create call: a single
    /// physical-host reservation carrying the host counts and predicate.
    pub fn reservations(&self) -> Vec<ReservationSpec> {
        vec![ReservationSpec {
            min: self.host_count_min,
            max: self.host_count_max,
            resource_type: "physical:host".to_string(),
            resource_properties: self.resource_properties.clone(),
            hypervisor_properties: None,
        }]
    }
}

/// Serde adapter for [`LEASE_DATE_FORMAT`] fields. The service echoes dates
/// back in ISO 8601, so deserialization accepts both forms.
pub mod lease_date {
    use super::*;
    use chrono::NaiveDateTime;
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&dt.format(LEASE_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in [LEASE_DATE_FORMAT, "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(naive.and_utc());
            }
        }
        Err(format!("unrecognized lease date `{raw}`"))
    }
}
