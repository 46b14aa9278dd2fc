use axum::{
    extract::{Query, State},
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{bearer_token, require_session, CurrentSession};
use crate::services::RouteDecision;
use crate::AppState;

/// Login and guard are public, logout and me need a live session
pub fn routes(state: AppState) -> Router<AppState> {
    let session = middleware::from_fn_with_state(state, require_session);

    Router::new()
        .route("/login", post(login))
        .route("/guard", get(guard))
        .route("/logout", post(logout).route_layer(session.clone()))
        .route("/me", get(get_current_session).route_layer(session))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: String,
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let session = state.auth.login(&payload.username, &payload.password).await?;

    Ok(Json(LoginResponse {
        token: session.token.to_string(),
        username: session.username,
        expires_at: session.expires_at.to_rfc3339(),
    }))
}

async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<serde_json::Value>> {
    state.auth.logout(current.token);
    state.listings.close(current.token);
    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub username: String,
}

async fn get_current_session(Extension(current): Extension<CurrentSession>) -> Json<SessionInfo> {
    Json(SessionInfo {
        username: current.username,
    })
}

#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    pub path: String,
}

async fn guard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GuardQuery>,
) -> Json<RouteDecision> {
    Json(state.auth.guard(bearer_token(&headers), &query.path))
}
