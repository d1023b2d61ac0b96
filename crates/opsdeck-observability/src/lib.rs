//! Opsdeck Observability
//!
//! Two complementary channels:
//!
//! - structured process logs via `tracing`, installed once at startup with
//!   [`init_tracing`];
//! - the [`BoundedTraceStore`], an in-process, fixed-capacity record of the
//!   traffic a running server has seen, readable through resources and the
//!   `/trace` HTTP views.

pub mod dump;
pub mod trace;

pub use trace::{
    BoundedTraceStore, COMMUNICATION_TRACE_CAPACITY, LIGHT_TRACE_CAPACITY, TraceDirection,
    TraceEntry, TraceStats,
};

use std::str::FromStr;

/// Output encoding for process logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::Config(format!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ))),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log output encoding
    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_filter: "info".to_string(),
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, falling back to `config.default_filter`. Logs go to
/// stderr so command output on stdout stays machine-readable. Fails if a
/// subscriber has already been installed.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .map_err(|e| ObservabilityError::Config(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    result.map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    tracing::info!(
        format = ?config.log_format,
        default_filter = %config.default_filter,
        "Initialized structured tracing"
    );
    Ok(())
}

/// Observability framework errors
#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
