use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::api::{ws, AppState};

async fn health_handler() -> &'static str {
    "ok"
}

/// Build the full axum router: a health probe and the single WebSocket
/// endpoint every client connects through (§4.5, §6).
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}
