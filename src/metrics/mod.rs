//! Metrics collection and exposition for Prometheus.
//!
//! Application code depends on the [`RedisRecorder`] trait and calls
//! [`RedisRecorder::collect`] once per finished backend call. The Prometheus
//! backed [`redis::Recorder`] aggregates those observations into a registry that
//! [`exposition::render`] turns into the text format scraped by a collector.

mod error;
pub mod exposition;
mod noop;
pub mod redis;

use std::sync::Arc;
use std::time::{Duration, Instant};

pub use error::{MetricsError, Result};
pub use noop::NoopRecorder;
pub use redis::{Config, Recorder};

/// Dimensions describing one completed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedisReqProperties<'a> {
    /// Logical namespace the command targeted.
    pub keyspace: &'a str,
    /// Backend command name, e.g. `GET` or `SET`.
    pub command: &'a str,
    /// Outcome of the call, e.g. `ok` or `err`.
    pub code: &'a str,
}

/// Trait for recording Redis request metrics.
pub trait RedisRecorder: Send + Sync {
    /// Records one finished request and how long it took.
    fn collect(&self, properties: &RedisReqProperties<'_>, duration: Duration);

    /// Runs `f`, timing it, and records the elapsed time under `properties`.
    fn observe<T, F>(&self, properties: &RedisReqProperties<'_>, f: F) -> T
    where
        Self: Sized,
        F: FnOnce() -> T,
    {
        let started = Instant::now();
        let result = f();
        self.collect(properties, started.elapsed());
        result
    }
}

impl<R: RedisRecorder + ?Sized> RedisRecorder for Arc<R> {
    fn collect(&self, properties: &RedisReqProperties<'_>, duration: Duration) {
        (**self).collect(properties, duration)
    }
}
