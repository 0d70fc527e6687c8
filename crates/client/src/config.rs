use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use domain::models::DeviceFilter;
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub live_feed: LiveFeedConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Origin of the sniffer API, e.g. `http://192.168.0.4:8000`.
    pub base_url: String,

    /// Per-request timeout in milliseconds. `0` disables the timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveFeedConfig {
    /// Delay between polls of the recent-sightings endpoint.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Sightings requested per poll (backend accepts 1-500).
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,

    /// Upper bound for the delay after consecutive failures.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Forward the first batch instead of only recording its watermark.
    #[serde(default = "default_backfill_on_start")]
    pub backfill_on_start: bool,
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            batch_limit: default_batch_limit(),
            max_backoff_ms: default_max_backoff_ms(),
            backfill_on_start: default_backfill_on_start(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// IANA zone used for rendering backend timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Initial device list filter: all, trusted or untrusted.
    #[serde(default = "default_device_filter")]
    pub device_filter: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            device_filter: default_device_filter(),
        }
    }
}

impl DisplayConfig {
    pub fn tz(&self) -> Result<Tz, ConfigValidationError> {
        Tz::from_str(&self.timezone).map_err(|_| {
            ConfigValidationError::InvalidValue(format!("Unknown timezone: {}", self.timezone))
        })
    }

    pub fn filter(&self) -> Result<DeviceFilter, ConfigValidationError> {
        self.device_filter
            .parse()
            .map_err(ConfigValidationError::InvalidValue)
    }
}

// Default value functions
fn default_request_timeout_ms() -> u64 {
    30000
}
fn default_user_agent() -> String {
    format!("probe-dash/{}", env!("CARGO_PKG_VERSION"))
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_batch_limit() -> u32 {
    50
}
fn default_max_backoff_ms() -> u64 {
    60000
}
fn default_backfill_on_start() -> bool {
    true
}
fn default_timezone() -> String {
    "America/New_York".to_string()
}
fn default_device_filter() -> String {
    "untrusted".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PROBE_DASH__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PROBE_DASH").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds entirely from embedded defaults and overrides, without touching
    /// config files or the environment.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [backend]
            base_url = ""
            request_timeout_ms = 30000
            user_agent = "probe-dash-test"

            [logging]
            level = "info"
            format = "pretty"

            [live_feed]
            poll_interval_ms = 2000
            batch_limit = 50
            max_backoff_ms = 60000
            backfill_on_start = true

            [display]
            timezone = "America/New_York"
            device_filter = "untrusted"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PROBE_DASH__BACKEND__BASE_URL environment variable must be set".to_string(),
            ));
        }

        let url = Url::parse(&self.backend.base_url).map_err(|e| {
            ConfigValidationError::InvalidValue(format!(
                "backend.base_url is not a valid URL: {}",
                e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigValidationError::InvalidValue(
                "backend.base_url must use http or https".to_string(),
            ));
        }

        if !(1..=500).contains(&self.live_feed.batch_limit) {
            return Err(ConfigValidationError::InvalidValue(
                "live_feed.batch_limit must be between 1 and 500".to_string(),
            ));
        }

        if self.live_feed.poll_interval_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "live_feed.poll_interval_ms cannot be 0".to_string(),
            ));
        }

        if self.live_feed.max_backoff_ms < self.live_feed.poll_interval_ms {
            return Err(ConfigValidationError::InvalidValue(
                "live_feed.max_backoff_ms cannot be less than poll_interval_ms".to_string(),
            ));
        }

        self.display.tz()?;
        self.display.filter()?;

        Ok(())
    }
}
