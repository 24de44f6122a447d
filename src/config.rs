//! Configuration types for vibe-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use utoipa::ToSchema;

/// Default RapidAPI host for the video download provider
pub const DEFAULT_PROVIDER_HOST: &str = "youtube-video-fast-downloader-24-7.p.rapidapi.com";

/// Upstream provider settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderConfig {
    /// RapidAPI key (`x-rapidapi-key`); jobs fail with `provider_not_configured` when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// RapidAPI host (`x-rapidapi-host`)
    #[serde(default = "default_provider_host")]
    pub host: String,

    /// Base URL override (default: `https://{host}`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request HTTP timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Upper bound for one job's whole resolution, retries included (default: 120 seconds)
    #[serde(default = "default_resolve_timeout", with = "duration_serde")]
    pub resolve_timeout: Duration,

    /// Retry policy for transient provider failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ProviderConfig {
    /// Effective base URL, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: default_provider_host(),
            base_url: None,
            request_timeout: default_request_timeout(),
            resolve_timeout: default_resolve_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for transient failures
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 10 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Job tracking settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobConfig {
    /// Maximum record age before eviction (default: 2 hours)
    ///
    /// Age is measured from completion, or from creation for jobs that never completed.
    #[serde(default = "default_ttl", with = "duration_serde")]
    pub ttl: Duration,

    /// Period between reaper sweeps (default: 1 hour)
    #[serde(default = "default_sweep_interval", with = "duration_serde")]
    pub sweep_interval: Duration,

    /// Maximum provider calls in flight at once (default: 16)
    #[serde(default = "default_max_concurrent_resolutions")]
    pub max_concurrent_resolutions: usize,

    /// How long shutdown waits for in-flight resolutions (default: 30 seconds)
    #[serde(default = "default_shutdown_timeout", with = "duration_serde")]
    pub shutdown_timeout: Duration,

    /// Event channel capacity (default: 1000)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            sweep_interval: default_sweep_interval(),
            max_concurrent_resolutions: default_max_concurrent_resolutions(),
            shutdown_timeout: default_shutdown_timeout(),
            event_buffer: default_event_buffer(),
        }
    }
}

/// API and external server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for the job tracker and its API server
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Upstream provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Job tracking settings
    #[serde(default)]
    pub jobs: JobConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Build a configuration from environment variables, starting from defaults.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `PORT` | port of `server.api.bind_address` |
    /// | `BIND_ADDRESS` | `server.api.bind_address` (wins over `PORT`) |
    /// | `RAPIDAPI_KEY` | `provider.api_key` |
    /// | `RAPIDAPI_HOST` | `provider.host` |
    /// | `RAPIDAPI_BASE_URL` | `provider.base_url` |
    /// | `JOB_TTL_SECS` | `jobs.ttl` |
    /// | `JOB_SWEEP_INTERVAL_SECS` | `jobs.sweep_interval` |
    /// | `MAX_CONCURRENT_RESOLUTIONS` | `jobs.max_concurrent_resolutions` |
    /// | `CORS_ORIGINS` | `server.api.cors_origins` (comma separated) |
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(port) = env_parse::<u16>("PORT")? {
            config.server.api.bind_address.set_port(port);
        }
        if let Some(addr) = env_parse::<SocketAddr>("BIND_ADDRESS")? {
            config.server.api.bind_address = addr;
        }
        if let Some(key) = env_string("RAPIDAPI_KEY") {
            config.provider.api_key = Some(key);
        }
        if let Some(host) = env_string("RAPIDAPI_HOST") {
            config.provider.host = host;
        }
        if let Some(base_url) = env_string("RAPIDAPI_BASE_URL") {
            config.provider.base_url = Some(base_url);
        }
        if let Some(secs) = env_parse::<u64>("JOB_TTL_SECS")? {
            config.jobs.ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("JOB_SWEEP_INTERVAL_SECS")? {
            config.jobs.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(limit) = env_parse::<usize>("MAX_CONCURRENT_RESOLUTIONS")? {
            config.jobs.max_concurrent_resolutions = limit;
        }
        if let Some(origins) = env_string("CORS_ORIGINS") {
            config.server.api.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the job tracker cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.jobs.ttl.is_zero() {
            return Err(config_error("ttl must be greater than zero", "jobs.ttl"));
        }
        if self.jobs.sweep_interval.is_zero() {
            return Err(config_error(
                "sweep interval must be greater than zero",
                "jobs.sweep_interval",
            ));
        }
        if self.jobs.max_concurrent_resolutions == 0 {
            return Err(config_error(
                "at least one concurrent resolution is required",
                "jobs.max_concurrent_resolutions",
            ));
        }
        if self.jobs.event_buffer == 0 {
            return Err(config_error(
                "event buffer must hold at least one event",
                "jobs.event_buffer",
            ));
        }
        url::Url::parse(&self.provider.base_url()).map_err(|e| {
            config_error(
                &format!("invalid provider base URL: {}", e),
                "provider.base_url",
            )
        })?;
        Ok(())
    }
}

fn config_error(message: &str, key: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| config_error(&format!("cannot parse {}={:?}: {}", key, raw, e), key))
        })
        .transpose()
}

// Default value functions
fn default_provider_host() -> String {
    DEFAULT_PROVIDER_HOST.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_resolve_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(10)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_ttl() -> Duration {
    Duration::from_secs(2 * 60 * 60)
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_max_concurrent_resolutions() -> usize {
    16
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_event_buffer() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
