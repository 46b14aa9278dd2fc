// Identity models - upstream records from the Kratos admin API and their
// flattened table projection
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used when flattening address lists into a single cell
pub const ADDRESS_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityState {
    Active,
    Inactive,
}

impl IdentityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityState::Active => "active",
            IdentityState::Inactive => "inactive",
        }
    }
}

impl fmt::Display for IdentityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiableAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub via: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    #[serde(default)]
    pub via: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityCredentials {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Identity as returned by the upstream identity-management API.
///
/// Only the listed fields are interpreted. Anything else the upstream sends
/// is kept in `extra` so exports stay faithful to the source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamIdentity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<IdentityState>,
    pub schema_id: String,
    #[serde(default)]
    pub verifiable_addresses: Vec<VerifiableAddress>,
    #[serde(default)]
    pub recovery_addresses: Vec<RecoveryAddress>,
    #[serde(default)]
    pub traits: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_public: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_admin: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<BTreeMap<String, IdentityCredentials>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UpstreamIdentity {
    pub fn verifiable_address_values(&self) -> String {
        self.verifiable_addresses
            .iter()
            .map(|address| address.value.as_str())
            .collect::<Vec<_>>()
            .join(ADDRESS_SEPARATOR)
    }

    pub fn recovery_address_values(&self) -> String {
        self.recovery_addresses
            .iter()
            .map(|address| address.value.as_str())
            .collect::<Vec<_>>()
            .join(ADDRESS_SEPARATOR)
    }
}

/// Flattened, string-only row used for table rendering and filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub id: String,
    pub state: String,
    pub schema: String,
    pub addresses: String,
}

impl From<&UpstreamIdentity> for DisplayRecord {
    fn from(identity: &UpstreamIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            state: identity
                .state
                .map(|state| state.as_str().to_string())
                .unwrap_or_default(),
            schema: identity.schema_id.clone(),
            addresses: identity.verifiable_address_values(),
        }
    }
}

/// Recovery link issued by the upstream service for one identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryLink {
    pub recovery_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}
