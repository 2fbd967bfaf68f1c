//! Exporter startup and server initialization.

use std::sync::Arc;

use prometheus::Registry;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::routes;
use crate::state::AppState;

/// Serves `/metrics` and `/health` for `registry` on the configured address.
///
/// Recorders should be created against the same `registry` before calling this.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>, registry: Registry) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        config: config.clone(),
        registry,
    };
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Serving metrics on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
