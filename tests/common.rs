use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use figment::Figment;
use figment::providers::{Format, Yaml};
use prometheus::Registry;
use redis_instrumenting::config::{ConfigV1, extract_config};
use redis_instrumenting::routes::create_router;
use redis_instrumenting::state::AppState;
use tower::ServiceExt;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:9091
logging:
  level: "debug"
  format: "json"
metrics:
  application: "test-app"
"#;

pub fn load_test_config() -> ConfigV1 {
    extract_config(Figment::new().merge(Yaml::string(TEST_CONFIG)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(registry: &Registry) -> Router {
    let state = AppState {
        config: Arc::new(load_test_config()),
        registry: registry.clone(),
    };
    create_router(state)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

/// Scrapes `/metrics` and returns the status, content type and body.
pub async fn scrape(app: &Router) -> (StatusCode, String, String) {
    let response = app
        .clone()
        .oneshot(get("/metrics"))
        .await
        .expect("request should complete");

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");

    (
        status,
        content_type,
        String::from_utf8(body.to_vec()).expect("metrics should be UTF-8"),
    )
}

pub fn assert_contains_all<S: AsRef<str>>(body: &str, expected: &[S]) {
    for line in expected {
        let line: &str = line.as_ref();
        assert!(
            body.contains(line),
            "metric not present on the result: {}\n--- body ---\n{}",
            line,
            body
        );
    }
}
