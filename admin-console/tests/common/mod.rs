// Shared fixtures for admin-console integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use admin_console::gateway::{GatewayError, IdentityGateway};
use admin_console::models::{RecoveryLink, UpstreamIdentity};
use async_trait::async_trait;
use mockall::mock;
use serde_json::json;
use tokio::sync::oneshot;

mock! {
    pub Gateway {}

    #[async_trait]
    impl IdentityGateway for Gateway {
        async fn list_identities(&self) -> Result<Vec<UpstreamIdentity>, GatewayError>;
        async fn get_identity(&self, id: &str) -> Result<UpstreamIdentity, GatewayError>;
        async fn delete_identity(&self, id: &str) -> Result<(), GatewayError>;
        async fn create_recovery_link(&self, id: &str) -> Result<RecoveryLink, GatewayError>;
    }
}

/// Build an identity the way Kratos serializes one
pub fn identity(id: &str, state: &str, schema: &str, emails: &[&str]) -> UpstreamIdentity {
    let addresses: Vec<serde_json::Value> = emails
        .iter()
        .map(|email| json!({ "value": email, "verified": false, "via": "email" }))
        .collect();

    serde_json::from_value(json!({
        "id": id,
        "state": state,
        "schema_id": schema,
        "traits": { "email": emails.first().copied().unwrap_or_default() },
        "verifiable_addresses": addresses,
        "recovery_addresses": [],
    }))
    .expect("valid identity fixture")
}

/// The two-row set used across listing scenarios
pub fn sample_identities() -> Vec<UpstreamIdentity> {
    vec![
        identity("a", "active", "s1", &["x@ex.com"]),
        identity("b", "inactive", "s2", &["y@ex.com"]),
    ]
}

pub fn http_error(status: u16) -> GatewayError {
    GatewayError::Http {
        status,
        message: "upstream failure".to_string(),
    }
}

pub fn recovery_link() -> RecoveryLink {
    RecoveryLink {
        recovery_link: "http://kratos/self-service/recovery?flow=1&token=t".to_string(),
        expires_at: None,
    }
}

/// Gateway whose listing calls resolve only when the test says so. Each
/// call takes the next pending receiver, in call order.
pub struct ScriptedGateway {
    pending: Mutex<VecDeque<oneshot::Receiver<Vec<UpstreamIdentity>>>>,
}

impl ScriptedGateway {
    pub fn new(pending: Vec<oneshot::Receiver<Vec<UpstreamIdentity>>>) -> Self {
        Self {
            pending: Mutex::new(pending.into()),
        }
    }
}

#[async_trait]
impl IdentityGateway for ScriptedGateway {
    async fn list_identities(&self) -> Result<Vec<UpstreamIdentity>, GatewayError> {
        let receiver = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected list_identities call");
        Ok(receiver.await.expect("listing sender dropped"))
    }

    async fn get_identity(&self, _id: &str) -> Result<UpstreamIdentity, GatewayError> {
        Err(http_error(404))
    }

    async fn delete_identity(&self, _id: &str) -> Result<(), GatewayError> {
        Err(http_error(501))
    }

    async fn create_recovery_link(&self, _id: &str) -> Result<RecoveryLink, GatewayError> {
        Err(http_error(501))
    }
}
