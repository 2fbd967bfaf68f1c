use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::metrics::Config as RedisMetricsConfig;

/// Environment variables with this prefix override values from the YAML file,
/// nested keys separated by `__` (e.g. `REDIS_METRICS_METRICS__APPLICATION`).
pub const ENV_PREFIX: &str = "REDIS_METRICS_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// What the exporter records and under which application name.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct MetricsConfig {
    /// Value of the `application` label on every series.
    pub application: String,
    #[serde(default)]
    pub redis: RedisMetricsConfig,
}

/// Extract a versioned config from an already assembled figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from "config.yaml" in the current directory, with environment overrides.
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    match extract_config(figment) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:9091
logging:
  level: "debug"
  format: "json"
metrics:
  application: "test-app"
  redis:
    duration_buckets: [1, 2, 10, 20, 50]
"#;

    #[test]
    fn parses_versioned_yaml() {
        let config = extract_config(Figment::new().merge(Yaml::string(TEST_CONFIG)))
            .expect("config should parse");

        assert_eq!(config.bind_address, "127.0.0.1:9091");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.metrics.application, "test-app");
        assert_eq!(
            config.metrics.redis.duration_buckets,
            vec![1.0, 2.0, 10.0, 20.0, 50.0]
        );
    }

    #[test]
    fn redis_section_is_optional() {
        let yaml = r#"
version: "1.0.0"
bind_address: 0.0.0.0:9090
logging:
  level: info
  format: console
metrics:
  application: other
"#;
        let config = extract_config(Figment::new().merge(Yaml::string(yaml))).unwrap();

        assert!(config.metrics.redis.duration_buckets.is_empty());
        assert_eq!(config.logging.format, LogFormat::Console);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let yaml = TEST_CONFIG.replace("1.0.0", "9.9.9");
        assert!(extract_config(Figment::new().merge(Yaml::string(&yaml))).is_err());
    }
}
