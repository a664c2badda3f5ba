//! Application settings model: defaults, env overrides, validation.

use std::str::FromStr;
use std::time::Duration;

use repofeed_store::EvictionPolicy;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Default listing endpoint.
const DEFAULT_API_BASE_URL: &str = "https://api.github.com/repositories";
/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Default attempts per page fetch, including the first.
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default pause between retry attempts in milliseconds.
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
/// Default delay before materializing a fetch result, in milliseconds.
const DEFAULT_DISPATCH_DELAY_MS: u64 = 500;
/// Default toast visibility window in milliseconds.
const DEFAULT_TOAST_DURATION_MS: u64 = 2_000;
/// Default log filter directive.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variables recognised by [`AppConfig::from_env`].
const ENV_API_BASE_URL: &str = "REPOFEED_API_BASE_URL";
const ENV_REQUEST_TIMEOUT_SECS: &str = "REPOFEED_REQUEST_TIMEOUT_SECS";
const ENV_RETRY_ATTEMPTS: &str = "REPOFEED_RETRY_ATTEMPTS";
const ENV_RETRY_BACKOFF_MS: &str = "REPOFEED_RETRY_BACKOFF_MS";
const ENV_DISPATCH_DELAY_MS: &str = "REPOFEED_DISPATCH_DELAY_MS";
const ENV_TOAST_DURATION_MS: &str = "REPOFEED_TOAST_DURATION_MS";
const ENV_EVICTION: &str = "REPOFEED_EVICTION";
const ENV_LOG_LEVEL: &str = "REPOFEED_LOG_LEVEL";

/// Validated application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listing endpoint queried for repository pages.
    pub api_base_url: Url,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per page fetch, including the first.
    pub retry_attempts: u32,
    /// Pause between retry attempts in milliseconds.
    pub retry_backoff_ms: u64,
    /// Delay before materializing a fetch result, in milliseconds.
    pub dispatch_delay_ms: u64,
    /// Toast visibility window in milliseconds.
    pub toast_duration_ms: u64,
    /// Store behaviour when an entry's refcount returns to zero.
    pub eviction: EvictionPolicy,
    /// Log filter directive installed at startup.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default URL parses"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            dispatch_delay_ms: DEFAULT_DISPATCH_DELAY_MS,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            eviction: EvictionPolicy::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load defaults with `REPOFEED_*` environment overrides applied, then
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override fails to parse or the final
    /// settings are invalid.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load with an explicit variable lookup; the testable core of
    /// [`from_env`](Self::from_env).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override fails to parse or the final
    /// settings are invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_API_BASE_URL) {
            config.api_base_url = Url::parse(&raw)
                .map_err(|_| ConfigError::invalid("api_base_url", raw, "must be a valid URL"))?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_number("request_timeout_secs", &raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_ATTEMPTS) {
            config.retry_attempts = parse_number("retry_attempts", &raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_BACKOFF_MS) {
            config.retry_backoff_ms = parse_number("retry_backoff_ms", &raw)?;
        }
        if let Some(raw) = lookup(ENV_DISPATCH_DELAY_MS) {
            config.dispatch_delay_ms = parse_number("dispatch_delay_ms", &raw)?;
        }
        if let Some(raw) = lookup(ENV_TOAST_DURATION_MS) {
            config.toast_duration_ms = parse_number("toast_duration_ms", &raw)?;
        }
        if let Some(raw) = lookup(ENV_EVICTION) {
            config.eviction = parse_eviction(&raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            config.log_level = raw;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the loaders cannot express through parsing alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for the first violated setting.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.api_base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::invalid(
                    "api_base_url",
                    other,
                    "scheme must be http or https",
                ));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "request_timeout_secs",
                "0",
                "must be positive",
            ));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::invalid(
                "retry_attempts",
                "0",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry backoff as a [`Duration`].
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Dispatch delay as a [`Duration`].
    #[must_use]
    pub const fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }

    /// Toast visibility window as a [`Duration`].
    #[must_use]
    pub const fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

fn parse_number<N: FromStr>(field: &'static str, raw: &str) -> ConfigResult<N> {
    raw.parse()
        .map_err(|_| ConfigError::invalid(field, raw, "must be a non-negative integer"))
}

fn parse_eviction(raw: &str) -> ConfigResult<EvictionPolicy> {
    match raw {
        "retain" => Ok(EvictionPolicy::Retain),
        "evict_on_zero" => Ok(EvictionPolicy::EvictOnZero),
        other => Err(ConfigError::invalid(
            "eviction",
            other,
            "must be 'retain' or 'evict_on_zero'",
        )),
    }
}
