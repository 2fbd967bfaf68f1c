//! Shared application state.

use crate::config::ConfigV1;
use prometheus::Registry;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Registry the recorders write into and `/metrics` renders from.
    pub registry: Registry,
}
