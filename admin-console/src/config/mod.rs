use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub kratos: KratosConfig,
    #[validate(nested)]
    pub auth: AuthConfig,
    #[validate(nested)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KratosConfig {
    /// Base URL of the Kratos admin API
    #[validate(url)]
    pub admin_url: String,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 1000))]
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthConfig {
    #[serde(default = "default_admin_username")]
    #[validate(length(min = 1))]
    pub admin_username: String,
    /// Argon2 PHC string, generate with the `hash-password` binary
    #[validate(length(min = 1))]
    pub admin_password_hash: String,
    /// Capped at 30 days
    #[serde(default = "default_session_ttl_minutes")]
    #[validate(range(min = 1, max = 43200))]
    pub session_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotificationConfig {
    #[serde(default = "default_capacity")]
    #[validate(range(min = 1, max = 4096))]
    pub capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    250
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_session_ttl_minutes() -> i64 {
    480
}

fn default_capacity() -> usize {
    64
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_builder(
            config::Config::builder().add_source(config::Environment::default().separator("__")),
        )
    }

    /// Apply defaults on top of `builder`, then deserialize and validate
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("kratos.admin_url", "http://127.0.0.1:4434")?
            .set_default("kratos.timeout_secs", 10)?
            .set_default("kratos.page_size", 250)?
            .set_default("auth.admin_username", "admin")?
            .set_default("auth.session_ttl_minutes", 480)?
            .set_default("notifications.capacity", 64)?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }
}
