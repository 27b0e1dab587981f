//! # Sieve Telemetry
//!
//! Logging setup for services embedding Sieve.
//!
//! Every Sieve crate reports through `tracing`:
//!
//! | Level | Event |
//! |-------|-------|
//! | `debug` | schema registration, filter construction, type registration |
//! | `trace` | each argument coerced during validation |
//! | `warn` | a registration replacing an earlier one |
//!
//! [`init_logging`] installs a `tracing-subscriber` formatter (JSON, pretty
//! or compact) behind an `EnvFilter`. Event fields use the names in
//! [`logging::fields`].

#![doc(html_root_url = "https://docs.rs/sieve-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
