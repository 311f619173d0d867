use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{auth::require_auth, AppState};

#[derive(Deserialize)]
struct RelayBody {
    url: String,
}

/// `GET /relays` is public; `POST`/`DELETE /relays` require the bearer
/// token — they mutate a set every webhook fan-out reads from.
pub fn relays_router(state: AppState) -> Router<AppState> {
    let read = Router::new().route("/relays", get(list_relays));
    let write = Router::new()
        .route("/relays", post(add_relay).delete(remove_relay))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    read.merge(write)
}

async fn list_relays(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "relays": state.relay_registry.list().await }))
}

async fn add_relay(State(state): State<AppState>, Json(body): Json<RelayBody>) -> (StatusCode, Json<Value>) {
    match state.relay_registry.add(body.url).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

async fn remove_relay(State(state): State<AppState>, Json(body): Json<RelayBody>) -> Json<Value> {
    let removed = state.relay_registry.remove(&body.url).await;
    Json(json!({ "removed": removed }))
}
