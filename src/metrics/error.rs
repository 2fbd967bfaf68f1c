use thiserror::Error;

/// Errors raised while building recorders or rendering the registry.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid duration buckets: {0}")]
    InvalidBuckets(String),
    #[error("metric family '{name}' is already registered for application '{application}'")]
    AlreadyRegistered { name: String, application: String },
    #[error("prometheus registry error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("failed to encode metrics: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
