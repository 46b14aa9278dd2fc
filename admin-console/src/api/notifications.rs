use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::ActiveNotification;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active))
        .route("/:id", delete(dismiss))
}

async fn list_active(State(state): State<AppState>) -> Json<Vec<ActiveNotification>> {
    Json(state.messages.active())
}

async fn dismiss(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    if !state.messages.dismiss(id) {
        return Err(AppError::NotFound(format!("Notification {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "dismissed": id })))
}
