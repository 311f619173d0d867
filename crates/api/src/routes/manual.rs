use axum::{extract::State, middleware, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::{auth::require_auth, AppState};

/// `POST /override` — manual "close all". Gated by the bearer token:
/// unlike the webhook, this is an operator action, not an ingress.
pub fn manual_override_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/override", post(post_override))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn post_override(State(state): State<AppState>) -> Json<Value> {
    let closed = {
        let mut core = state.core.lock().unwrap();
        core.handle_override()
    };
    info!(closed = closed.len(), "Manual override applied");
    Json(json!({ "status": "ok", "closed": closed.len() }))
}
