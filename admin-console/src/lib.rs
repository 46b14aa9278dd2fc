//! Identity admin console backend.
//!
//! Serves the identities listing, detail, export and session endpoints that
//! a browser front-end renders. All identity data lives in the upstream Kratos
//! admin API.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::listing::ListingSessions;
use crate::services::{AuthContext, IdentityService, MessageService};

#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<ListingSessions>,
    pub identities: IdentityService,
    pub auth: Arc<AuthContext>,
    pub messages: MessageService,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::routes(state.clone()))
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
