//! REST client for the Blazar reservation service.
//!
//! Every operation is one request/response round trip; failures carry the
//! remote error message and are never retried here.

mod api;
mod error;

pub use api::ReservationApi;
pub use error::ClientError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use models::{Event, Lease, Network, ReservationSpec, LEASE_DATE_FORMAT};

/// Client for the reservation service's v1 HTTP API.
pub struct BlazarClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BlazarClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let req = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => req.header("X-Auth-Token", token),
            None => req,
        }
    }
}

/// Turns a raw response into a decoded body or the typed error for its
/// status, preserving whatever message the service sent back.
async fn read<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &'static str,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    status_error(status, &body)?;

    serde_json::from_str(&body).map_err(|source| ClientError::Decode { context, source })
}

async fn read_empty(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    let body = response.text().await?;
    status_error(status, &body)
}

/// Maps a non-success status to the matching [`ClientError`], pulling the
/// service's `error_message` out of the body when present.
fn status_error(status: StatusCode, body: &str) -> Result<(), ClientError> {
    if status.is_success() {
        return Ok(());
    }

    let message = remote_message(body);
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(message));
    }
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn remote_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Request body for a lease create call, with dates in the service's
/// expected wire format.
fn lease_create_body(
    name: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reservations: &[ReservationSpec],
    events: &[Event],
) -> Value {
    json!({
        "name": name,
        "start_date": start.format(LEASE_DATE_FORMAT).to_string(),
        "end_date": end.format(LEASE_DATE_FORMAT).to_string(),
        "reservations": reservations,
        "events": events,
    })
}

#[derive(serde::Deserialize)]
struct LeaseEnvelope {
    lease: Lease,
}

#[derive(serde::Deserialize)]
struct LeasesEnvelope {
    leases: Vec<Lease>,
}

#[derive(serde::Deserialize)]
struct NetworkEnvelope {
    network: Network,
}

#[derive(serde::Deserialize)]
struct NetworksEnvelope {
    networks: Vec<Network>,
}

#[async_trait]
impl ReservationApi for BlazarClient {
    async fn list_leases(&self) -> Result<Vec<Lease>, ClientError> {
        let response = self.request(Method::GET, "/leases").send().await?;
        let envelope: LeasesEnvelope = read(response, "lease list").await?;
        Ok(envelope.leases)
    }

    async fn get_lease(&self, id: &str) -> Result<Lease, ClientError> {
        let response = self
            .request(Method::GET, &format!("/leases/{id}"))
            .send()
            .await?;
        let envelope: LeaseEnvelope = read(response, "lease").await?;
        Ok(envelope.lease)
    }

    async fn create_lease(
        &self,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        reservations: Vec<ReservationSpec>,
        events: Vec<Event>,
    ) -> Result<Lease, ClientError> {
        let body = lease_create_body(name, start, end, &reservations, &events);
        let response = self
            .request(Method::POST, "/leases")
            .json(&body)
            .send()
            .await?;
        let envelope: LeaseEnvelope = read(response, "created lease").await?;
        Ok(envelope.lease)
    }

    async fn update_lease(&self, id: &str, changes: Value) -> Result<Lease, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/leases/{id}"))
            .json(&changes)
            .send()
            .await?;
        let envelope: LeaseEnvelope = read(response, "updated lease").await?;
        Ok(envelope.lease)
    }

    async fn delete_lease(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/leases/{id}"))
            .send()
            .await?;
        read_empty(response).await
    }

    async fn list_networks(&self) -> Result<Vec<Network>, ClientError> {
        let response = self.request(Method::GET, "/networks").send().await?;
        let envelope: NetworksEnvelope = read(response, "network list").await?;
        Ok(envelope.networks)
    }

    async fn get_network(&self, id: &str) -> Result<Network, ClientError> {
        let response = self
            .request(Method::GET, &format!("/networks/{id}"))
            .send()
            .await?;
        let envelope: NetworkEnvelope = read(response, "network").await?;
        Ok(envelope.network)
    }

    async fn create_network(&self, params: Value) -> Result<Network, ClientError> {
        let response = self
            .request(Method::POST, "/networks")
            .json(&params)
            .send()
            .await?;
        let envelope: NetworkEnvelope = read(response, "created network").await?;
        Ok(envelope.network)
    }

    async fn update_network(&self, id: &str, changes: Value) -> Result<Network, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/networks/{id}"))
            .json(&changes)
            .send()
            .await?;
        let envelope: NetworkEnvelope = read(response, "updated network").await?;
        Ok(envelope.network)
    }

    async fn delete_network(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/networks/{id}"))
            .send()
            .await?;
        read_empty(response).await
    }
}
