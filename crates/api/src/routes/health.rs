use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Liveness probe — no auth required.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let mode = state.core.lock().unwrap().mode();
    Json(json!({ "status": "ok", "mode": mode.to_string() }))
}
