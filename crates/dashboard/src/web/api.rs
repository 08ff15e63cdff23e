//! Blobs exchanged with the dashboard frontend. Anything declared as a
//! 'blob' is an ephemeral API shape, never stored anywhere.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use models::Lease;

/// Raw lease-creation form, exactly as the frontend submits it. Dates and
/// times arrive as separate free-text fields in the submitter's local
/// timezone; validation turns them into UTC instants.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LeaseFormBlob {
    pub name: String,
    /// `YYYY-MM-DD`; blank means "now".
    #[serde(default)]
    pub start_date: String,
    /// `HH:MM`; blank with a date means local midnight.
    #[serde(default)]
    pub start_time: String,
    /// `YYYY-MM-DD`; blank means one day after the start.
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub end_time: String,
    pub min_hosts: u32,
    pub max_hosts: u32,
    /// IANA timezone name the date/time fields are expressed in,
    /// e.g. `America/Chicago`.
    pub timezone: String,
    /// Restrict the reservation to hosts of this type.
    #[serde(default)]
    pub node_type: Option<String>,
    /// Pin the reservation to one specific host; outranks `node_type`.
    #[serde(default)]
    pub node_uid: Option<String>,
}

/// Update form for an existing lease. All fields optional; blank and
/// absent read the same.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateLeaseBlob {
    #[serde(default)]
    pub name: Option<String>,
    /// Extend the lease end, e.g. `2h`, `1d`.
    #[serde(default)]
    pub prolong_for: Option<String>,
    /// Shorten the lease end; ignored when `prolong_for` is also given.
    #[serde(default)]
    pub reduce_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateLeaseResponse {
    /// The change set was sent and the service returned the updated lease.
    Updated { lease: Lease },
    /// The submission changed nothing; no remote call was made.
    NoChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteLeaseResponse {
    pub success: bool,
    /// True when the remote delete failed but the failure was swallowed
    /// rather than answered with a 5xx, so the dashboard row can still be
    /// cleared. The error text lands in `details` and the server log.
    pub suppressed: bool,
    pub details: String,
}

/// Everything the calendar view renders: the host inventory down the side
/// and the reservation bars across it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CalendarData {
    pub compute_hosts: Vec<CalendarHost>,
    pub reservations: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CalendarHost {
    pub id: String,
    pub hostname: String,
    pub node_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CalendarEntry {
    pub compute_host_id: String,
    pub lease_name: String,
    pub project_id: Option<String>,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
}
