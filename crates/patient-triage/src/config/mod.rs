use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::assessment::FetchPolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub api: ApiConfig,
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_defaults = ApiConfig::default();
        let api = ApiConfig {
            base_url: env::var("APP_API_BASE_URL").unwrap_or(api_defaults.base_url),
            api_key: env::var("APP_API_KEY").unwrap_or(api_defaults.api_key),
            timeout: Duration::from_secs(parse_var("APP_API_TIMEOUT_SECS", 30)?),
            transport_retries: parse_var("APP_API_TRANSPORT_RETRIES", 3)?,
            transport_backoff: api_defaults.transport_backoff,
        };

        let fetch = FetchPolicy {
            page_limit: parse_var("APP_PAGE_LIMIT", 5)?,
            max_rate_limit_retries: parse_var("APP_RATE_LIMIT_RETRIES", 5)?,
            default_retry_after: Duration::from_secs(parse_var("APP_RATE_LIMIT_DEFAULT_SECS", 5)?),
            page_delay: Duration::from_millis(parse_var("APP_PAGE_DELAY_MS", 500)?),
        };
        if fetch.page_limit == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "APP_PAGE_LIMIT",
            });
        }

        let run_on_startup = flag_var("APP_RUN_ON_STARTUP", true)?;
        let startup_failure_fatal = flag_var("APP_STARTUP_RUN_FATAL", false)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            api,
            assessment: AssessmentConfig {
                fetch,
                run_on_startup,
                startup_failure_fatal,
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

fn flag_var(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag { key }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the upstream healthcare API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub transport_retries: u32,
    pub transport_backoff: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            transport_retries: 3,
            transport_backoff: Duration::from_secs(1),
        }
    }
}

/// Paging policy and trigger behavior for assessment runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentConfig {
    pub fetch: FetchPolicy,
    pub run_on_startup: bool,
    /// When set, a failed startup run stops the process instead of being logged.
    pub startup_failure_fatal: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidFlag { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a valid whole number")
            }
            ConfigError::InvalidFlag { key } => {
                write!(f, "{key} must be one of true/false, yes/no, on/off, 1/0")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
