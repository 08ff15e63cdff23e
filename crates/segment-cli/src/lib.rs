//! CLI surface for network-segment management against the reservation
//! service. The root binary embeds [`NetworkCommand`] as a subcommand and
//! hands the parsed action to [`run`].

mod error;
mod params;
mod output;

pub use error::SegmentCliError;
pub use output::LIST_COLUMNS;

use clap::Subcommand;
use colored::Colorize;
use tracing::info;

use client::ReservationApi;
use params::{build_create_body, build_update_body};
use output::{json_indent4, network_table};

#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
    /// Print a list of network segments
    List {
        /// Column name used to sort the result
        #[clap(long = "sort-by", value_name = "<network_column>", default_value = "id")]
        sort_by: String,
    },
    /// Show details of one network segment
    Show {
        /// ID of the network segment
        id: String,
    },
    /// Create a network segment
    Create {
        /// Type of the network segment (flat, geneve, gre, local, vlan, vxlan)
        #[clap(long = "network-type")]
        network_type: String,
        /// Physical network backing the segment; vlan only
        #[clap(long = "physical-network")]
        physical_network: Option<String>,
        /// Segment ID to add
        #[clap(long)]
        segment: u32,
        /// Extra capability key/value pairs to add for the network
        #[clap(long = "extra", value_name = "<key>=<value>")]
        extra: Vec<String>,
    },
    /// Update attributes of a network segment
    Update {
        /// ID of the network segment
        id: String,
        /// Extra capability key/value pairs to update for the network
        #[clap(long = "extra", value_name = "<key>=<value>")]
        extra: Vec<String>,
    },
    /// Delete a network segment
    Delete {
        /// ID of the network segment
        id: String,
    },
}

pub async fn run(
    client: &dyn ReservationApi,
    command: NetworkCommand,
) -> Result<(), SegmentCliError> {
    match command {
        NetworkCommand::List { sort_by } => {
            let networks = client.list_networks().await?;
            print!("{}", network_table(&networks, &sort_by)?);
        }
        NetworkCommand::Show { id } => {
            let network = client.get_network(&id).await?;
            println!("{}", json_indent4(&network)?);
        }
        NetworkCommand::Create {
            network_type,
            physical_network,
            segment,
            extra,
        } => {
            let body =
                build_create_body(&network_type, physical_network.as_deref(), segment, &extra)?;
            let network = client.create_network(body).await?;
            info!("created network segment {}", network.id);
            println!("{}", json_indent4(&network)?);
        }
        NetworkCommand::Update { id, extra } => {
            let body = build_update_body(&extra)?;
            let network = client.update_network(&id, body).await?;
            println!("{}", json_indent4(&network)?);
        }
        NetworkCommand::Delete { id } => {
            client.delete_network(&id).await?;
            println!("Deleted network segment {id}");
        }
    }

    Ok(())
}

pub fn match_and_print(result: Result<(), SegmentCliError>) {
    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!(
                "{}{}",
                "Error encountered: ".red().bold(),
                e.to_string().red()
            );
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use client::ClientError;
    use models::{Event, Lease, Network, ReservationSpec};
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records every network call so tests can assert what reached the
    /// remote service (and, for rejected input, that nothing did).
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingApi {
        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, op: &str, body: Value) {
            self.calls.lock().unwrap().push((op.to_string(), body));
        }
    }

    #[async_trait]
    impl ReservationApi for RecordingApi {
        async fn list_leases(&self) -> Result<Vec<Lease>, ClientError> {
            Ok(vec![])
        }
        async fn get_lease(&self, _id: &str) -> Result<Lease, ClientError> {
            unimplemented!("not exercised")
        }
        async fn create_lease(
            &self,
            _name: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
            _reservations: Vec<ReservationSpec>,
            _events: Vec<Event>,
        ) -> Result<Lease, ClientError> {
            unimplemented!("not exercised")
        }
        async fn update_lease(&self, _id: &str, _changes: Value) -> Result<Lease, ClientError> {
            unimplemented!("not exercised")
        }
        async fn delete_lease(&self, _id: &str) -> Result<(), ClientError> {
            unimplemented!("not exercised")
        }

        async fn list_networks(&self) -> Result<Vec<Network>, ClientError> {
            self.record("list", Value::Null);
            Ok(vec![])
        }
        async fn get_network(&self, id: &str) -> Result<Network, ClientError> {
            self.record("get", Value::String(id.to_string()));
            Ok(sample_network(id))
        }
        async fn create_network(&self, params: Value) -> Result<Network, ClientError> {
            self.record("create", params);
            Ok(sample_network("created"))
        }
        async fn update_network(&self, id: &str, changes: Value) -> Result<Network, ClientError> {
            self.record("update", serde_json::json!({ "id": id, "changes": changes }));
            Ok(sample_network(id))
        }
        async fn delete_network(&self, id: &str) -> Result<(), ClientError> {
            self.record("delete", Value::String(id.to_string()));
            Ok(())
        }
    }

    fn sample_network(id: &str) -> Network {
        Network {
            id: id.to_string(),
            network_type: models::NetworkType::Flat,
            physical_network: None,
            segment_id: 100,
            extras: Default::default(),
        }
    }

    #[tokio::test]
    async fn create_sends_the_merged_body() {
        let api = RecordingApi::default();
        let command = NetworkCommand::Create {
            network_type: "vlan".to_string(),
            physical_network: Some("physnet1".to_string()),
            segment: 1234,
            extra: vec!["a=1".to_string(), "a=2".to_string()],
        };

        run(&api, command).await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        let (op, body) = &calls[0];
        assert_eq!(op, "create");
        assert_eq!(body["network_type"], "vlan");
        assert_eq!(body["segment_id"], 1234);
        assert_eq!(body["a"], "2");
    }

    #[tokio::test]
    async fn invalid_create_issues_no_remote_call() {
        let api = RecordingApi::default();
        let command = NetworkCommand::Create {
            network_type: "flat".to_string(),
            physical_network: Some("physnet1".to_string()),
            segment: 100,
            extra: vec![],
        };

        let err = run(&api, command).await.unwrap_err();
        assert!(matches!(err, SegmentCliError::UnexpectedPhysicalNetwork(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn update_wraps_changes_under_values() {
        let api = RecordingApi::default();
        let command = NetworkCommand::Update {
            id: "n1".to_string(),
            extra: vec!["usage_type=storage".to_string()],
        };

        run(&api, command).await.unwrap();

        let calls = api.calls();
        assert_eq!(calls[0].0, "update");
        assert_eq!(calls[0].1["changes"]["values"]["usage_type"], "storage");
    }

    #[tokio::test]
    async fn unknown_sort_column_is_rejected_before_printing() {
        let api = RecordingApi::default();
        let err = run(
            &api,
            NetworkCommand::List {
                sort_by: "bogus".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SegmentCliError::UnknownSortColumn(_)));
    }
}
