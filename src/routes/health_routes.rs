//! Liveness endpoint.

use crate::state::AppState;
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use tracing::debug;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!(
        application = state.config.metrics.application.as_str(),
        "Health check"
    );
    (StatusCode::OK, "OK")
}
