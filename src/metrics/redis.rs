//! Redis request metrics recorded with Prometheus.

use std::sync::Arc;
use std::time::Duration;

use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{MetricsError, RedisRecorder, RedisReqProperties, Result};
use crate::utils::log_throttle::LogThrottle;

pub const REQUESTS_TOTAL: &str = "app_redis_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "app_redis_request_duration_seconds";

/// Default histogram ladder in seconds; `+Inf` is appended by Prometheus.
pub const DEFAULT_DURATION_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const LABELS: [&str; 3] = ["command", "keyspace", "status"];
const REJECTED_SAMPLE_LOG_WINDOW: Duration = Duration::from_secs(60);

/// Recorder configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct Config {
    /// Histogram upper bounds in seconds, strictly ascending.
    /// Leave empty to use [`DEFAULT_DURATION_BUCKETS`].
    #[serde(default)]
    pub duration_buckets: Vec<f64>,
}

impl Config {
    /// Returns the validated bucket ladder.
    pub fn buckets(&self) -> Result<Vec<f64>> {
        if self.duration_buckets.is_empty() {
            return Ok(DEFAULT_DURATION_BUCKETS.to_vec());
        }

        for bound in &self.duration_buckets {
            if !bound.is_finite() || *bound <= 0.0 {
                return Err(MetricsError::InvalidBuckets(format!(
                    "bucket {} must be a finite, positive number of seconds",
                    bound
                )));
            }
        }
        if let Some(pair) = self
            .duration_buckets
            .windows(2)
            .find(|pair| pair[0] >= pair[1])
        {
            return Err(MetricsError::InvalidBuckets(format!(
                "buckets must be strictly ascending, found {} before {}",
                pair[0], pair[1]
            )));
        }

        Ok(self.duration_buckets.clone())
    }
}

/// Prometheus backed [`RedisRecorder`].
///
/// Cloning is cheap; clones share the same counters and histograms.
#[derive(Clone)]
pub struct Recorder {
    application: String,
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    log_throttle: Arc<LogThrottle>,
}

impl Recorder {
    /// Creates a recorder for `application` and registers its metric families
    /// into `registry`.
    ///
    /// # Errors
    ///
    /// Fails with [`MetricsError::InvalidBuckets`] for a bad ladder and with
    /// [`MetricsError::AlreadyRegistered`] when the application already has a
    /// recorder registered there. Nothing stays registered on failure.
    pub fn new(application: impl Into<String>, config: &Config, registry: &Registry) -> Result<Self> {
        let application = application.into();
        let buckets = config.buckets()?;

        let requests_total = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Total number of Redis requests")
                .const_label("application", application.as_str()),
            &LABELS,
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                REQUEST_DURATION_SECONDS,
                "Redis request duration in seconds",
            )
            .const_label("application", application.as_str())
            .buckets(buckets.clone()),
            &LABELS,
        )?;

        register(registry, &requests_total, REQUESTS_TOTAL, &application)?;
        if let Err(e) = register(
            registry,
            &request_duration_seconds,
            REQUEST_DURATION_SECONDS,
            &application,
        ) {
            if let Err(rollback) = registry.unregister(Box::new(requests_total.clone())) {
                warn!(
                    application = application.as_str(),
                    "Failed to roll back {} registration: {}", REQUESTS_TOTAL, rollback
                );
            }
            return Err(e);
        }

        debug!(
            application = application.as_str(),
            buckets = ?buckets,
            "Registered Redis metric families"
        );

        Ok(Recorder {
            application,
            registry: registry.clone(),
            requests_total,
            request_duration_seconds,
            log_throttle: Arc::new(LogThrottle::new()),
        })
    }

    /// Same as [`Recorder::new`], using the process-wide default registry.
    pub fn with_default_registry(application: impl Into<String>, config: &Config) -> Result<Self> {
        Self::new(application, config, prometheus::default_registry())
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    /// Records a duration given in seconds.
    ///
    /// Negative, NaN and infinite values are dropped and logged, so they can
    /// never break bucket monotonicity.
    pub fn collect_seconds(&self, properties: &RedisReqProperties<'_>, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            if let Some(suppressed) = self
                .log_throttle
                .should_emit("rejected_sample", REJECTED_SAMPLE_LOG_WINDOW)
            {
                warn!(
                    application = self.application.as_str(),
                    command = properties.command,
                    keyspace = properties.keyspace,
                    seconds,
                    suppressed,
                    "Dropping invalid Redis request duration"
                );
            }
            return;
        }
        self.record(properties, seconds);
    }

    /// Removes this recorder's metric families from the registry.
    ///
    /// Samples collected afterwards are no longer exposed. Both families are
    /// always attempted; the first failure is returned.
    pub fn unregister(&self) -> Result<()> {
        let counter = self
            .registry
            .unregister(Box::new(self.requests_total.clone()));
        let histogram = self
            .registry
            .unregister(Box::new(self.request_duration_seconds.clone()));
        counter?;
        histogram?;
        info!(
            application = self.application.as_str(),
            "Unregistered Redis metric families"
        );
        Ok(())
    }

    fn record(&self, properties: &RedisReqProperties<'_>, seconds: f64) {
        let labels = [properties.command, properties.keyspace, properties.code];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration_seconds
            .with_label_values(&labels)
            .observe(seconds);
    }
}

impl RedisRecorder for Recorder {
    fn collect(&self, properties: &RedisReqProperties<'_>, duration: Duration) {
        self.record(properties, duration.as_secs_f64());
    }
}

fn register<C>(registry: &Registry, collector: &C, name: &str, application: &str) -> Result<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|e| match e {
            prometheus::Error::AlreadyReg => MetricsError::AlreadyRegistered {
                name: name.to_string(),
                application: application.to_string(),
            },
            other => MetricsError::Prometheus(other),
        })
}
