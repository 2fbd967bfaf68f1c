use std::time::Duration;

use super::{RedisRecorder, RedisReqProperties};

/// Recorder that drops every observation. Useful when metrics are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl RedisRecorder for NoopRecorder {
    fn collect(&self, _properties: &RedisReqProperties<'_>, _duration: Duration) {}
}
