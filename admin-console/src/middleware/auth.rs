use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: Uuid,
    pub username: String,
}

/// Session token from an `Authorization: Bearer <uuid>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .and_then(|token| Uuid::parse_str(token.trim()).ok())
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    let session = state.auth.session(token).ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(CurrentSession {
        token: session.token,
        username: session.username,
    });

    Ok(next.run(request).await)
}
