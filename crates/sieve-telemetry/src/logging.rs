//! Structured logging for Sieve.
//!
//! Library crates only emit `tracing` events. Embedders that want them on
//! stdout call [`init_logging`] once at start-up:
//!
//! ```rust,no_run
//! use sieve_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::debug!(schema = "by_number", "registered argument schema");
//! # Ok::<(), sieve_telemetry::TelemetryError>(())
//! ```

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is installed at all.
    pub enabled: bool,

    /// Filter directive, e.g. `"info"` or `"sieve_args=trace,info"`.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether span creation and close are logged.
    pub span_events: bool,

    /// Whether events carry their source file and line.
    pub file_line_info: bool,

    /// Whether events carry their target module path.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            span_events: false,
            file_line_info: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Human-readable output with per-argument tracing.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "sieve=debug,sieve_args=trace,info".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            ..Self::default()
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Parses the level directive.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] if the directive does not
    /// parse.
    pub fn filter(&self) -> TelemetryResult<EnvFilter> {
        create_env_filter(&self.level)
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a bad level directive and
/// [`TelemetryError::LoggingInit`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = config.filter()?;
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);

    let layer = match config.format {
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
        LogFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if the directive does not parse.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Field names used by Sieve's log events.
pub mod fields {
    /// Argument schema name.
    pub const SCHEMA: &str = "schema";

    /// Argument name.
    pub const ARGUMENT: &str = "argument";

    /// Type identifier.
    pub const TYPE_ID: &str = "type_id";

    /// Filter tag.
    pub const TAG: &str = "tag";

    /// Query name.
    pub const QUERY: &str = "query";

    /// Error kind.
    pub const ERROR_KIND: &str = "error_kind";
}

/// Logs arguments rejected by a schema at `debug`.
#[macro_export]
macro_rules! log_rejected_arguments {
    ($schema:expr, $error:expr) => {
        tracing::debug!(
            schema = %$schema,
            error_kind = ?$error.kind(),
            error = %$error,
            "arguments rejected"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.span_events);
        assert!(config.file_line_info);
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_production_config() {
        assert_eq!(LogConfig::production(), LogConfig::default());
    }

    #[test]
    fn test_invalid_directive() {
        let err = create_env_filter("sieve=[").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { directive, .. } if directive == "sieve=["));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(fields::SCHEMA, "schema");
        assert_eq!(fields::ARGUMENT, "argument");
        assert_eq!(fields::TYPE_ID, "type_id");
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            level: "not a directive [".to_string(),
            ..LogConfig::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
