// Identity service - single-identity detail and export
use std::sync::Arc;

use serde::Serialize;

use crate::gateway::{IdentityGateway, Result};
use crate::models::{UpstreamIdentity, ADDRESS_SEPARATOR};
use crate::utils::format_optional_datetime;

#[derive(Clone)]
pub struct IdentityService {
    gateway: Arc<dyn IdentityGateway>,
}

/// Side panel of the identity detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySummary {
    pub id: String,
    pub state: String,
    pub schema_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub verifiable_addresses: String,
    pub recovery_addresses: String,
    pub credentials: String,
}

impl IdentityService {
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, id: &str) -> Result<UpstreamIdentity> {
        self.gateway.get_identity(id).await
    }
}

impl From<&UpstreamIdentity> for IdentitySummary {
    fn from(identity: &UpstreamIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            state: identity
                .state
                .map(|state| state.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            schema_id: identity.schema_id.clone(),
            created_at: format_optional_datetime(identity.created_at),
            updated_at: format_optional_datetime(identity.updated_at),
            verifiable_addresses: identity.verifiable_address_values(),
            recovery_addresses: identity.recovery_address_values(),
            credentials: summarize_credentials(identity),
        }
    }
}

/// `password (a@ex.com), oidc (google:123)`
fn summarize_credentials(identity: &UpstreamIdentity) -> String {
    identity
        .credentials
        .iter()
        .flatten()
        .map(|(kind, credential)| format!("{} ({})", kind, credential.identifiers.join(",")))
        .collect::<Vec<_>>()
        .join(ADDRESS_SEPARATOR)
}

/// Pretty-printed JSON of the full identity as received upstream
pub fn export_json(identity: &UpstreamIdentity) -> serde_json::Result<String> {
    serde_json::to_string_pretty(identity)
}

pub fn export_file_name(identity: &UpstreamIdentity) -> String {
    format!("identity-{}.json", identity.id)
}
