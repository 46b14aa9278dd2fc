use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_console::config::Config;
use admin_console::gateway::{IdentityGateway, KratosClient};
use admin_console::listing::ListingSessions;
use admin_console::services::{AuthContext, IdentityService, MessageService, PasswordHashVerifier};
use admin_console::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "admin_console=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");

    // Upstream identity API
    let gateway: Arc<dyn IdentityGateway> = Arc::new(
        KratosClient::new(&config.kratos).context("Failed to build Kratos client")?,
    );
    tracing::info!(admin_url = %config.kratos.admin_url, "Kratos admin client ready");

    let verifier = PasswordHashVerifier::from_config(&config.auth)
        .context("Failed to load admin credentials")?;
    let auth = Arc::new(AuthContext::new(
        Arc::new(verifier),
        chrono::Duration::minutes(config.auth.session_ttl_minutes),
    ));

    let messages = MessageService::new(config.notifications.capacity);
    // Each session loads its own listing on first use
    let listings = Arc::new(ListingSessions::new(gateway.clone(), messages.clone()));

    // Build application state
    let state = AppState {
        listings,
        identities: IdentityService::new(gateway),
        auth,
        messages,
    };

    let app = admin_console::app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
