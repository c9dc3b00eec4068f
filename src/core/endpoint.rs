use serde::{Deserialize, Serialize};

/// A DNS record in the orchestrator-facing shape: fully qualified name,
/// record type and an ordered target list. A `ttl` of `None` means the
/// orchestrator left it unconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    pub record_type: String,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(rename = "recordTTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// The desired-state diff computed by the orchestrator. `update_old` carries
/// the previous state of updated records and is informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    #[serde(default)]
    pub create: Vec<Endpoint>,
    #[serde(default)]
    pub update_old: Vec<Endpoint>,
    #[serde(default)]
    pub update_new: Vec<Endpoint>,
    #[serde(default)]
    pub delete: Vec<Endpoint>,
}
