//! Web dashboard for the Blazar reservation service: lease intake with
//! local validation, lease lifecycle routes, and the availability calendar.

pub mod availability;
pub mod lease;
pub mod web;

pub use web::entry;
