use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::AppState;

pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/webhook", post(post_webhook))
}

/// Accepts a freeform alert body, parses it for an "Accepted Entry"/
/// "Accepted Exit" phrase, and — on a match — publishes to the signal bus
/// and fans the raw text out to every registered relay. Malformed or
/// unrecognized bodies are rejected with 400 rather than silently
/// dropped: malformed input is a 4xx, not a panic and not a 200.
async fn post_webhook(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    let Some(side) = signal::parse_webhook_text(&body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "status": "rejected" })));
    };

    let ts = chrono::Utc::now().timestamp_millis();
    info!(%side, "Webhook accepted");
    state.signal_bus.publish(side, ts);

    let urls = state.relay_registry.list().await;
    if !urls.is_empty() {
        let payload = relay::RelayPayload::new(side, body, ts);
        relay::fan_out(state.relay_client.clone(), urls, payload);
    }

    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
