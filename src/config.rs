//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_EXECUTION_BASE_URL, DEFAULT_FETCH_TIMEOUT_SECONDS,
    DEFAULT_IN_FLIGHT_LOCK_SECONDS, DEFAULT_RECONCILE_TIMEOUT_SECONDS,
    DEFAULT_RESULT_POLL_ATTEMPTS, DEFAULT_RESULT_POLL_INTERVAL_MS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_SUBMIT_TIMEOUT_SECONDS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub execution: ExecutionConfig,
    pub grading: GradingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Code execution service configuration
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    pub base_url: String,
    pub submit_timeout: Duration,
    pub fetch_timeout: Duration,
    /// Attempts made while the service reports the result as not ready
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

/// Submission grading configuration
#[derive(Debug, Clone)]
pub struct GradingConfig {
    /// Timeout for writing the solved question record
    pub reconcile_timeout: Duration,
    /// Expiry of the in-flight lock, in case a request dies holding it
    pub in_flight_lock_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            execution: ExecutionConfig::from_env()?,
            grading: GradingConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
        })
    }
}

impl ExecutionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let poll_attempts = parse_var("EXECUTION_POLL_ATTEMPTS", DEFAULT_RESULT_POLL_ATTEMPTS)?;
        if poll_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "EXECUTION_POLL_ATTEMPTS".to_string(),
            ));
        }

        Ok(Self {
            base_url: env::var("EXECUTION_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_EXECUTION_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            submit_timeout: Duration::from_secs(parse_var(
                "EXECUTION_SUBMIT_TIMEOUT_SECONDS",
                DEFAULT_SUBMIT_TIMEOUT_SECONDS,
            )?),
            fetch_timeout: Duration::from_secs(parse_var(
                "EXECUTION_FETCH_TIMEOUT_SECONDS",
                DEFAULT_FETCH_TIMEOUT_SECONDS,
            )?),
            poll_attempts,
            poll_interval: Duration::from_millis(parse_var(
                "EXECUTION_POLL_INTERVAL_MS",
                DEFAULT_RESULT_POLL_INTERVAL_MS,
            )?),
        })
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXECUTION_BASE_URL.to_string(),
            submit_timeout: Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECONDS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECONDS),
            poll_attempts: DEFAULT_RESULT_POLL_ATTEMPTS,
            poll_interval: Duration::from_millis(DEFAULT_RESULT_POLL_INTERVAL_MS),
        }
    }
}

impl GradingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            reconcile_timeout: Duration::from_secs(parse_var(
                "GRADING_RECONCILE_TIMEOUT_SECONDS",
                DEFAULT_RECONCILE_TIMEOUT_SECONDS,
            )?),
            in_flight_lock_ttl: Duration::from_secs(parse_var(
                "GRADING_IN_FLIGHT_LOCK_SECONDS",
                DEFAULT_IN_FLIGHT_LOCK_SECONDS,
            )?),
        })
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            reconcile_timeout: Duration::from_secs(DEFAULT_RECONCILE_TIMEOUT_SECONDS),
            in_flight_lock_ttl: Duration::from_secs(DEFAULT_IN_FLIGHT_LOCK_SECONDS),
        }
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
