// Auth context - console sessions and route guarding
use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::Route;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Credential store misconfigured: {0}")]
    Misconfigured(String),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Checks a username/password pair against some identity-verification backend
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> AuthResult<()>;
}

/// Verifies against one configured administrator and an argon2 hash
pub struct PasswordHashVerifier {
    username: String,
    password_hash: String,
}

impl PasswordHashVerifier {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> AuthResult<Self> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash)
            .map_err(|e| AuthError::Misconfigured(format!("Invalid password hash: {}", e)))?;

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        Self::new(&config.admin_username, &config.admin_password_hash)
    }
}

#[async_trait]
impl CredentialVerifier for PasswordHashVerifier {
    async fn verify(&self, username: &str, password: &str) -> AuthResult<()> {
        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| AuthError::Misconfigured(format!("Invalid password hash: {}", e)))?;

        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        if username == self.username && password_ok {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub token: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum RouteDecision {
    Allow(Route),
    Redirect(Route),
}

/// Holds the live console sessions. Route guards consult it instead of any
/// process-global flag.
pub struct AuthContext {
    verifier: Arc<dyn CredentialVerifier>,
    sessions: RwLock<HashMap<Uuid, AdminSession>>,
    ttl: Duration,
}

impl AuthContext {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, ttl: Duration) -> Self {
        Self {
            verifier,
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthResult<AdminSession> {
        if let Err(err) = self.verifier.verify(username, password).await {
            tracing::warn!(username, error = %err, "console login rejected");
            return Err(err);
        }

        let created_at = Utc::now();
        let session = AdminSession {
            token: Uuid::new_v4(),
            username: username.to_string(),
            created_at,
            expires_at: created_at + self.ttl,
        };
        self.sessions.write().insert(session.token, session.clone());

        tracing::info!(username, "console session started");
        Ok(session)
    }

    pub fn logout(&self, token: Uuid) -> bool {
        let removed = self.sessions.write().remove(&token);
        if let Some(session) = &removed {
            tracing::info!(username = %session.username, "console session ended");
        }
        removed.is_some()
    }

    /// Live session for `token`; expired sessions are evicted on lookup
    pub fn session(&self, token: Uuid) -> Option<AdminSession> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read();
            match sessions.get(&token) {
                Some(session) if session.expires_at > now => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().remove(&token);
        None
    }

    /// Remove every expired session and return their tokens
    pub fn evict_expired(&self) -> Vec<Uuid> {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let expired: Vec<Uuid> = sessions
            .values()
            .filter(|session| session.expires_at <= now)
            .map(|session| session.token)
            .collect();
        for token in &expired {
            sessions.remove(token);
        }
        expired
    }

    pub fn is_authenticated(&self, token: Option<Uuid>) -> bool {
        token.and_then(|token| self.session(token)).is_some()
    }

    /// Decide where a navigation to `path` ends up
    pub fn guard(&self, token: Option<Uuid>, path: &str) -> RouteDecision {
        let authenticated = self.is_authenticated(token);

        match Route::parse(path) {
            Some(Route::Login) if authenticated => RouteDecision::Redirect(Route::Identities),
            Some(route) if route.is_protected() && !authenticated => {
                RouteDecision::Redirect(Route::Login)
            }
            Some(route) => RouteDecision::Allow(route),
            None if authenticated => RouteDecision::Redirect(Route::Identities),
            None => RouteDecision::Redirect(Route::Login),
        }
    }
}
