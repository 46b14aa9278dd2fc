mod auth;
mod identities;
mod notifications;

use axum::{middleware, Router};

use crate::middleware::require_session;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/identities", identities::routes())
        .nest("/notifications", notifications::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .nest("/auth", auth::routes(state))
        .merge(protected)
}
