use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::listing::{
    BulkOutcome, CommandKey, CommandOutcome, ListingController, ListingView, RefreshOutcome,
    SearchMode,
};
use crate::middleware::CurrentSession;
use crate::models::{Notification, UpstreamIdentity};
use crate::services::{export_file_name, export_json, IdentitySummary};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_listing))
        .route("/refresh", post(refresh))
        .route("/search", put(search))
        .route("/selection", put(select))
        .route("/commands/:key", post(trigger_command))
        .route("/delete", post(delete_selected))
        .route("/delete/cancel", post(cancel_delete))
        .route("/recovery", post(recover_selected))
        .route("/:id", get(get_identity))
        .route("/:id/export", get(export_identity))
}

#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub outcome: T,
    pub listing: ListingView,
}

/// Listing of the calling session. Listings of expired sessions are
/// dropped on the way.
async fn session_listing(state: &AppState, current: &CurrentSession) -> Arc<ListingController> {
    state.listings.close_all(&state.auth.evict_expired());
    state.listings.controller(current.token).await
}

async fn get_listing(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Json<ListingView> {
    Json(session_listing(&state, &current).await.view())
}

async fn refresh(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Json<ActionResponse<RefreshOutcome>> {
    let controller = session_listing(&state, &current).await;
    let outcome = controller.refresh(true).await;
    Json(ActionResponse {
        outcome,
        listing: controller.view(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub mode: Option<SearchMode>,
}

async fn search(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Json(payload): Json<SearchRequest>,
) -> Json<ListingView> {
    let controller = session_listing(&state, &current).await;
    if let Some(mode) = payload.mode {
        controller.set_mode(mode);
    }
    Json(controller.set_query(payload.query))
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub ids: Vec<String>,
}

async fn select(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Json(payload): Json<SelectionRequest>,
) -> Json<ListingView> {
    let controller = session_listing(&state, &current).await;
    Json(controller.set_selection(payload.ids))
}

async fn trigger_command(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(key): Path<String>,
) -> Result<Json<ActionResponse<CommandOutcome>>> {
    let key: CommandKey = key.parse()?;

    let controller = session_listing(&state, &current).await;
    let outcome = controller.trigger(key).await?;
    Ok(Json(ActionResponse {
        outcome,
        listing: controller.view(),
    }))
}

async fn delete_selected(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<ActionResponse<BulkOutcome>>> {
    let controller = session_listing(&state, &current).await;
    let outcome = controller.delete_selected().await?;
    Ok(Json(ActionResponse {
        outcome,
        listing: controller.view(),
    }))
}

async fn cancel_delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Json<ListingView> {
    Json(session_listing(&state, &current).await.cancel_delete())
}

async fn recover_selected(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Json<ActionResponse<BulkOutcome>> {
    let controller = session_listing(&state, &current).await;
    let outcome = controller.recover_selected().await;
    Json(ActionResponse {
        outcome,
        listing: controller.view(),
    })
}

#[derive(Debug, Serialize)]
pub struct IdentityDetailResponse {
    pub summary: IdentitySummary,
    pub identity: UpstreamIdentity,
}

async fn get_identity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IdentityDetailResponse>> {
    let identity = state.identities.get(&id).await?;

    Ok(Json(IdentityDetailResponse {
        summary: IdentitySummary::from(&identity),
        identity,
    }))
}

async fn export_identity(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let identity = match state.identities.get(&id).await {
        Ok(identity) => identity,
        Err(err) => {
            state
                .messages
                .dispatch(Notification::error("failed to export identity", 3));
            return Err(err.into());
        }
    };

    let body = export_json(&identity).map_err(|e| AppError::Internal(e.into()))?;
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export_file_name(&identity)
    ))
    .map_err(|e| AppError::Internal(e.into()))?;

    state
        .messages
        .dispatch(Notification::success("Identity exported to JSON", 2));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
