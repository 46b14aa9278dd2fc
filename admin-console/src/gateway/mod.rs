//! Remote identity gateway
//!
//! The console owns no identity data. Every read and write goes through an
//! [`IdentityGateway`]; [`KratosClient`] talks to the Ory Kratos admin API.

mod kratos;

use async_trait::async_trait;

use crate::models::{RecoveryLink, UpstreamIdentity};

pub use kratos::KratosClient;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Upstream returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// All identities known upstream, in upstream order
    async fn list_identities(&self) -> Result<Vec<UpstreamIdentity>>;

    async fn get_identity(&self, id: &str) -> Result<UpstreamIdentity>;

    async fn delete_identity(&self, id: &str) -> Result<()>;

    async fn create_recovery_link(&self, id: &str) -> Result<RecoveryLink>;
}
