//! Shared domain types for the Blazar tooling: leases and reservations as the
//! reservation service exposes them, network segments as the CLI manages
//! them, and the half-open time windows both sides reason about.

pub mod lease;
pub mod network;
pub mod window;

pub use lease::{Event, Lease, LeaseRequest, Reservation, ReservationSpec, LEASE_DATE_FORMAT};
pub use network::{Network, NetworkType};
pub use window::TimeWindow;
