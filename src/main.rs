use std::sync::Arc;

use prometheus::Registry;
use redis_instrumenting::config::{load_config, print_schema};
use redis_instrumenting::metrics::Recorder;
use redis_instrumenting::startup::run;
use redis_instrumenting::utils::logger::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--schema") {
        if let Err(e) = print_schema() {
            eprintln!("Failed to print schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    let registry = Registry::new();
    // Registers the Redis families so they show up as soon as the first call is recorded.
    let recorder = match Recorder::new(
        config.metrics.application.clone(),
        &config.metrics.redis,
        &registry,
    ) {
        Ok(recorder) => recorder,
        Err(e) => {
            error!("Failed to create Redis recorder: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        application = recorder.application(),
        "Redis metrics recorder ready"
    );

    if let Err(e) = run(config, registry).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
