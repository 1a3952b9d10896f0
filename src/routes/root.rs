use axum::{routing::get, Json, Router};
use tracing::info;

use crate::models::MessageResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> Json<MessageResponse> {
    info!("GET / - Root");
    Json(MessageResponse::new("Stockwatch backend is running"))
}

async fn health() -> &'static str {
    info!("GET /health");
    "OK"
}
