use client::ClientError;
use models::NetworkType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmentCliError {
    #[error("unknown network type `{0}`")]
    BadNetworkType(String),

    #[error("--physical-network is required when the network type is vlan")]
    MissingPhysicalNetwork,

    #[error("--physical-network only applies to vlan segments, not `{0}`")]
    UnexpectedPhysicalNetwork(NetworkType),

    #[error("malformed --extra `{0}`, expected <key>=<value>")]
    MalformedExtra(String),

    #[error("cannot sort by unknown column `{0}`")]
    UnknownSortColumn(String),

    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("serializing output: {0}")]
    Json(#[from] serde_json::Error),
}
