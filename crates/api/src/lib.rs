mod auth;
pub mod core;
pub mod routes;

use std::sync::{Arc, Mutex};

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use crate::core::{Core, CoreState, StatusResponse};

/// Shared application state injected into every route handler. `core` is
/// the single mutex-guarded FSM/broker/P&L/session aggregate; the bus and
/// relay registry are independent collaborators the webhook handler
/// talks to directly.
#[derive(Clone)]
pub struct AppState {
    pub core: Arc<Mutex<Core>>,
    pub signal_bus: Arc<signal::SignalBus>,
    pub relay_registry: Arc<relay::RelayRegistry>,
    pub relay_client: reqwest::Client,
    pub symbol: String,
    pub api_token: Option<String>,
}

/// Build and run the Axum API server.
pub async fn serve(state: AppState, port: u16) {
    let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);

    let app = Router::new()
        .merge(routes::webhook_router())
        .merge(routes::status_router())
        .merge(routes::relays_router(state.clone()))
        .merge(routes::manual_override_router(state.clone()))
        .merge(routes::health_router())
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind port {port}: {e}"));
    info!(port, "API server listening");
    axum::serve(listener, app).await.unwrap();
}
