use axum::{extract::State, routing::get, Json, Router};

use crate::{AppState, StatusResponse};

pub fn status_router() -> Router<AppState> {
    Router::new().route("/status", get(get_status))
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let core = state.core.lock().unwrap();
    Json(core.status(&state.symbol))
}
