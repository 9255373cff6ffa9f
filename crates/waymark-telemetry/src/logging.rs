//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber writing JSON (production) or
//! pretty, human-readable lines (development). `RUST_LOG` wins over the
//! configured level when it is set.
//!
//! ```rust,no_run
//! use waymark_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//! tracing::info!(route = "/api/users/{user_id}", "ready");
//! ```

use serde::Deserialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{TelemetryError, TelemetryResult};

/// Logging configuration.
///
/// Deserializes from a config table; missing keys take the
/// [`LogConfig::default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether to install a subscriber at all.
    pub enabled: bool,

    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info"` or
    /// `"waymark_server=debug,info"`.
    pub level: String,

    /// JSON lines instead of pretty output.
    pub json_format: bool,

    /// Include source file and line.
    pub file_line_info: bool,

    /// Include the event target (module path).
    pub include_target: bool,

    /// Service name logged once at startup.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Debug level, pretty output with file and line.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            file_line_info: true,
            include_target: true,
            service_name: "waymark".to_string(),
        }
    }

    /// Info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
            service_name: "waymark".to_string(),
        }
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing if `config.enabled` is false.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] for a bad level directive, and
/// [`TelemetryError::LoggingInit`] if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_filter(config, std::env::var(EnvFilter::DEFAULT_ENV).ok())?;

    if config.json_format {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(service = %config.service_name, "logging initialized");
    Ok(())
}

/// Builds the filter from an optional `RUST_LOG` value, falling back to
/// `config.level`. An empty override counts as unset.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] naming whichever directive failed.
pub fn build_filter(config: &LogConfig, env_override: Option<String>) -> TelemetryResult<EnvFilter> {
    let directive = env_override
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.level.clone());

    EnvFilter::try_new(&directive).map_err(|e| TelemetryError::InvalidFilter {
        filter: directive,
        reason: e.to_string(),
    })
}
