//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// Installing the global subscriber failed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("already set".to_string());
        assert_eq!(err.to_string(), "failed to initialize logging: already set");

        let err = TelemetryError::InvalidFilter {
            directive: "sieve=loud".to_string(),
            reason: "bad level".to_string(),
        };
        assert_eq!(err.to_string(), "invalid log filter `sieve=loud`: bad level");
    }
}
