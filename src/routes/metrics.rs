//! Metrics exposition endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use http::header::CONTENT_TYPE;
use tracing::error;

use crate::metrics::exposition;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Creates the metrics route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Handler for the /metrics endpoint.
///
/// Returns a point-in-time snapshot of every registered family in
/// Prometheus text format.
async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, HTTPError> {
    let metrics_text = exposition::render(&state.registry).map_err(|e| {
        error!("Failed to render metrics: {}", e);
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, exposition::CONTENT_TYPE)],
        metrics_text,
    ))
}
