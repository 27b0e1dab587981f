//! Layered configuration for Sieve.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`SIEVE__SECTION__KEY`)
//! - Strict parsing (unknown fields are errors)
//! - Argument schemas declared as data
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [registry]
//! builtin_type_handlers = false
//!
//! [schemas.by_number.number]
//! type = "integer"
//!
//! [schemas.by_number.active]
//! type = "boolean"
//! optional = true
//!
//! [schemas.find_owner.owner]
//! type = { class = "User" }
//! description = "Owner of the record"
//! ```
//!
//! Schemas are validated when the configuration loads: every type must be a
//! tag or a `{ class = ... }` identifier, and no argument may be both
//! optional and defaulted.

#![doc(html_root_url = "https://docs.rs/sieve-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::SieveConfig;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, RegistryConfig, SchemaDefinitions};
