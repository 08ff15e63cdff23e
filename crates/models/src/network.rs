use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

/// Segmentation technology of a network segment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NetworkType {
    Flat,
    Geneve,
    Gre,
    Local,
    Vlan,
    Vxlan,
}

impl NetworkType {
    /// Only vlan segments are tied to a named physical network.
    pub fn requires_physical_network(&self) -> bool {
        matches!(self, NetworkType::Vlan)
    }
}

/// A network segment as the reservation service reports it. Extra
/// capabilities ride along as flattened key/value pairs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Network {
    pub id: String,
    pub network_type: NetworkType,
    #[serde(default)]
    pub physical_network: Option<String>,
    pub segment_id: u32,
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

impl Network {
    /// Column lookup for sortable list output. Unknown names yield `None`.
    pub fn column(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "network_type" => Some(self.network_type.to_string()),
            "physical_network" => Some(self.physical_network.clone().unwrap_or_default()),
            "segment_id" => Some(self.segment_id.to_string()),
            _ => None,
        }
    }
}
