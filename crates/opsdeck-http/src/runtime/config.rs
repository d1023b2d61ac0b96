//! # Environment-Based Configuration
//!
//! Runtime settings for the HTTP server, loadable from environment variables
//! so a deployment can be tuned without a rebuild.
//!
//! ## Environment Variables
//!
//! - `OPSDECK_BIND_ADDR` - Socket address to listen on (default: 127.0.0.1:5000)
//! - `OPSDECK_REQUEST_TIMEOUT_SECS` - Request timeout in seconds, 1..=300 (default: 30)
//! - `OPSDECK_MAX_BODY_SIZE` - Maximum request body size in bytes (default: 1048576 / 1MB)
//! - `OPSDECK_ENABLE_CORS` - Enable permissive CORS (default: true)
//! - `OPSDECK_TRACE_CAPACITY` - Entries kept by the communication trace (default: 128, max: 100000)
//! - `OPSDECK_LOG_FORMAT` - `json` or `pretty` (default: json)

use opsdeck_observability::{COMMUNICATION_TRACE_CAPACITY, LogFormat, ObservabilityConfig};
use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

pub const BIND_ADDR_ENV: &str = "OPSDECK_BIND_ADDR";
pub const REQUEST_TIMEOUT_ENV: &str = "OPSDECK_REQUEST_TIMEOUT_SECS";
pub const MAX_BODY_SIZE_ENV: &str = "OPSDECK_MAX_BODY_SIZE";
pub const ENABLE_CORS_ENV: &str = "OPSDECK_ENABLE_CORS";
pub const TRACE_CAPACITY_ENV: &str = "OPSDECK_TRACE_CAPACITY";
pub const LOG_FORMAT_ENV: &str = "OPSDECK_LOG_FORMAT";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
const MAX_BODY_SIZE_LIMIT: usize = 100 * 1024 * 1024;
const MAX_TRACE_CAPACITY: usize = 100_000;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// HTTP runtime configuration
#[derive(Debug, Clone)]
pub struct HttpRuntimeConfig {
    /// Address the server listens on
    pub bind_addr: SocketAddr,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable CORS for cross-origin requests
    pub enable_cors: bool,
    /// Capacity of the communication trace store
    pub trace_capacity: usize,
    /// Process log settings
    pub observability: ObservabilityConfig,
}

impl HttpRuntimeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
            enable_cors: true,
            trace_capacity: COMMUNICATION_TRACE_CAPACITY,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Builder for `HttpRuntimeConfig` with environment variable support
#[derive(Debug, Clone)]
pub struct HttpRuntimeConfigBuilder {
    config: HttpRuntimeConfig,
}

impl Default for HttpRuntimeConfigBuilder {
    fn default() -> Self {
        Self {
            config: HttpRuntimeConfig::default(),
        }
    }
}

impl HttpRuntimeConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        if let Some(addr) = get_env_string(BIND_ADDR_ENV) {
            let addr = addr.trim().parse().map_err(|e| ConfigError::InvalidEnvVar {
                key: BIND_ADDR_ENV.to_string(),
                message: format!("invalid socket address '{addr}': {e}"),
            })?;
            builder = builder.bind_addr(addr);
        }
        if let Some(timeout) = get_env_u64(REQUEST_TIMEOUT_ENV)? {
            builder = builder.request_timeout_secs(timeout);
        }
        if let Some(max_size) = get_env_usize(MAX_BODY_SIZE_ENV)? {
            builder = builder.max_body_size(max_size);
        }
        if let Some(cors) = get_env_bool(ENABLE_CORS_ENV)? {
            builder = builder.enable_cors(cors);
        }
        if let Some(capacity) = get_env_usize(TRACE_CAPACITY_ENV)? {
            builder = builder.trace_capacity(capacity);
        }
        if let Some(format) = get_env_string(LOG_FORMAT_ENV) {
            let format = format
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    key: LOG_FORMAT_ENV.to_string(),
                    message: e.to_string(),
                })?;
            builder = builder.log_format(format);
        }

        Ok(builder)
    }

    #[must_use]
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set request timeout in seconds
    #[must_use]
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.config.request_timeout_secs = timeout;
        self
    }

    /// Set maximum request body size in bytes
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Enable or disable CORS
    #[must_use]
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    #[must_use]
    pub fn trace_capacity(mut self, capacity: usize) -> Self {
        self.config.trace_capacity = capacity;
        self
    }

    #[must_use]
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.observability.log_format = format;
        self
    }

    /// Validate configuration and build `HttpRuntimeConfig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<HttpRuntimeConfig, ConfigError> {
        self.validate()?;
        Ok(self.config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let config = &self.config;

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if config.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be <= 300 (5 minutes)".to_string(),
            ));
        }

        if config.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be greater than 0".to_string(),
            ));
        }
        if config.max_body_size > MAX_BODY_SIZE_LIMIT {
            return Err(ConfigError::ValidationError(
                "max_body_size must be <= 100MB".to_string(),
            ));
        }

        if config.trace_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "trace_capacity must be greater than 0".to_string(),
            ));
        }
        if config.trace_capacity > MAX_TRACE_CAPACITY {
            return Err(ConfigError::ValidationError(
                "trace_capacity must be <= 100000".to_string(),
            ));
        }

        Ok(())
    }
}

// Environment variable helper functions

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match get_env_string(key) {
        Some(val) => match val.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        None => Ok(None),
    }
}

fn get_env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match get_env_string(key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

fn get_env_usize(key: &str) -> Result<Option<usize>, ConfigError> {
    match get_env_string(key) {
        Some(val) => val
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid usize value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let config = HttpRuntimeConfigBuilder::new().build().unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert!(config.enable_cors);
        assert_eq!(config.trace_capacity, 128);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_builder_validation_timeout() {
        let err = HttpRuntimeConfigBuilder::new()
            .request_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("request_timeout_secs must be greater than 0")
        );

        let err = HttpRuntimeConfigBuilder::new()
            .request_timeout_secs(301)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs must be <= 300"));

        assert!(
            HttpRuntimeConfigBuilder::new()
                .request_timeout_secs(300)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_builder_validation_max_body_size() {
        let err = HttpRuntimeConfigBuilder::new()
            .max_body_size(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_body_size must be greater than 0"));

        let err = HttpRuntimeConfigBuilder::new()
            .max_body_size(MAX_BODY_SIZE_LIMIT + 1)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_body_size must be <= 100MB"));
    }

    #[test]
    fn test_builder_validation_trace_capacity() {
        let err = HttpRuntimeConfigBuilder::new()
            .trace_capacity(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = HttpRuntimeConfigBuilder::new()
            .trace_capacity(usize::MAX)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("trace_capacity must be <= 100000"));

        assert!(
            HttpRuntimeConfigBuilder::new()
                .trace_capacity(MAX_TRACE_CAPACITY)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_builder_custom_values() {
        let config = HttpRuntimeConfigBuilder::new()
            .bind_addr("0.0.0.0:8080".parse().unwrap())
            .request_timeout_secs(60)
            .max_body_size(32 * 1024)
            .enable_cors(false)
            .trace_capacity(64)
            .log_format(LogFormat::Pretty)
            .build()
            .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.max_body_size, 32 * 1024);
        assert!(!config.enable_cors);
        assert_eq!(config.trace_capacity, 64);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_bool_parsing() {
        assert_eq!(get_env_bool("OPSDECK_NONEXISTENT_FLAG").unwrap(), None);
    }
}
