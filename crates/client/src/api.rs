use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ClientError;
use models::{Event, Lease, Network, ReservationSpec};

/// The contract the rest of the tooling consumes: synchronous
/// request/response CRUD against the reservation service.
///
/// The concrete [`crate::BlazarClient`] implements this; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    async fn list_leases(&self) -> Result<Vec<Lease>, ClientError>;
    async fn get_lease(&self, id: &str) -> Result<Lease, ClientError>;
    async fn create_lease(
        &self,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        reservations: Vec<ReservationSpec>,
        events: Vec<Event>,
    ) -> Result<Lease, ClientError>;
    async fn update_lease(&self, id: &str, changes: Value) -> Result<Lease, ClientError>;
    async fn delete_lease(&self, id: &str) -> Result<(), ClientError>;

    async fn list_networks(&self) -> Result<Vec<Network>, ClientError>;
    async fn get_network(&self, id: &str) -> Result<Network, ClientError>;
    async fn create_network(&self, params: Value) -> Result<Network, ClientError>;
    async fn update_network(&self, id: &str, changes: Value) -> Result<Network, ClientError>;
    async fn delete_network(&self, id: &str) -> Result<(), ClientError>;
}
