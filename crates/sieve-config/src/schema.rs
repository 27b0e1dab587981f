//! Configuration sections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sieve_args::ArgDefinition;
use sieve_telemetry::LogConfig;

/// Argument schemas by name, each an ordered map of argument definitions.
pub type SchemaDefinitions = IndexMap<String, IndexMap<String, ArgDefinition>>;

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable multi-line format (development).
    Pretty,
    /// Human-readable single-line format.
    Compact,
}

impl From<LogFormat> for sieve_telemetry::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. `info`, `sieve_args=trace,info`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Log span creation and close.
    #[serde(default)]
    pub span_events: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Include the event target.
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            span_events: false,
            include_location: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Converts the section into the telemetry crate's configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format.into(),
            span_events: self.span_events,
            file_line_info: self.include_location,
            include_target: self.include_target,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Registry initialisation options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Register the built-in string, integer, float and boolean type
    /// handlers.
    ///
    /// Registered handlers take over coercion of those types from their
    /// filters.
    #[serde(default)]
    pub builtin_type_handlers: bool,
}
