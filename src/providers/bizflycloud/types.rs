use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::endpoint::Endpoint;
use crate::providers::bizflycloud::error::BizflyApiError;

/// Record types that take part in translation. Anything else is dropped
/// when reading and never produced when writing.
pub const SUPPORTED_RECORD_TYPES: [&str; 5] = ["A", "AAAA", "CNAME", "SRV", "TXT"];

pub fn supported_record_type(record_type: &str) -> bool {
    SUPPORTED_RECORD_TYPES.contains(&record_type)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A zone plus its full record set, as returned by the zone-detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneDetail {
    #[serde(flatten)]
    pub zone: Zone,
    #[serde(default)]
    pub records_set: Vec<Record>,
}

/// A record as the remote system stores it. `name` is zone-relative, with
/// `"@"` standing for the zone apex, and `id` is the only stable handle for
/// update and delete. The API types record data per element, so it arrives
/// as raw JSON values.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub zone_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    #[serde(default)]
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListZonesResponse {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub max_results: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::Create => write!(f, "CREATE"),
            ChangeAction::Update => write!(f, "UPDATE"),
            ChangeAction::Delete => write!(f, "DELETE"),
        }
    }
}

/// The record fields a mutation needs, with the canonical (fully qualified)
/// name and the TTL already resolved by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalRecord {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub data: Vec<String>,
}

/// One planned mutation. Ephemeral, produced per reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub action: ChangeAction,
    pub record: NormalRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRecordPayload {
    pub name: String,
    pub ttl: u32,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRecordPayload {
    pub name: String,
    pub ttl: u32,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: Vec<String>,
}

impl From<&RecordChange> for CreateRecordPayload {
    fn from(change: &RecordChange) -> Self {
        CreateRecordPayload {
            name: change.record.name.clone(),
            ttl: change.record.ttl,
            record_type: change.record.record_type.clone(),
            data: change.record.data.clone(),
        }
    }
}

impl From<&RecordChange> for UpdateRecordPayload {
    fn from(change: &RecordChange) -> Self {
        UpdateRecordPayload {
            name: change.record.name.clone(),
            ttl: change.record.ttl,
            record_type: change.record.record_type.clone(),
            data: change.record.data.clone(),
        }
    }
}

/// Error body the API attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}

/// The fully qualified name of a zone-relative record. The zone apex is
/// stored as `"@"` and maps to the zone name itself.
pub fn canonical_name(zone_name: &str, record_name: &str) -> String {
    if record_name == "@" {
        zone_name.to_string()
    } else {
        format!("{record_name}.{zone_name}")
    }
}

/// Translate a native record into a canonical endpoint. Returns `Ok(None)`
/// for unsupported record types. Record data elements must be strings; the
/// remote API guarantees this, so anything else is a contract violation and
/// fails the pass instead of being coerced.
pub fn to_endpoint(zone_name: &str, record: &Record) -> Result<Option<Endpoint>, BizflyApiError> {
    if !supported_record_type(&record.record_type) {
        return Ok(None);
    }
    let mut targets = Vec::with_capacity(record.data.len());
    for value in &record.data {
        match value {
            Value::String(target) => targets.push(target.clone()),
            other => {
                return Err(BizflyApiError::Parse(format!(
                    "record {} has a non-string data element: {other}",
                    record.id
                )));
            }
        }
    }
    Ok(Some(Endpoint {
        dns_name: canonical_name(zone_name, &record.name),
        record_type: record.record_type.clone(),
        targets,
        ttl: Some(record.ttl),
    }))
}

#[cfg(test)]
pub(crate) fn record_data(targets: &[&str]) -> Vec<Value> {
    targets
        .iter()
        .map(|target| Value::String((*target).to_string()))
        .collect()
}
