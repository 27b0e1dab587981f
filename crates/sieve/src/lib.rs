//! # Sieve
//!
//! Runtime argument validation and type coercion.
//!
//! Sieve takes a loosely-typed mapping of named arguments, checks it against
//! a declared schema, and returns a normalized mapping in which every
//! argument is cast to its declared type, defaults are filled in, and absent
//! optional arguments are present as null.
//!
//! ## Quick Start
//!
//! ```
//! use sieve::prelude::*;
//!
//! let config: SieveConfig = toml::from_str(r#"
//!     [schemas.by_number.number]
//!     type = "integer"
//!
//!     [schemas.by_number.active]
//!     type = "boolean"
//!     optional = true
//! "#).unwrap();
//!
//! let sieve = Sieve::from_config(&config).unwrap();
//!
//! let mut given = Arguments::new();
//! given.insert("number".into(), Value::from("9"));
//! let normalized = sieve.validate("by_number", given).unwrap();
//!
//! assert_eq!(normalized["number"], Value::Integer(9));
//! assert!(normalized["active"].is_null());
//! ```
//!
//! ## Crates
//!
//! - [`core`]: values, type specifications, entities and errors
//! - [`types`]: the runtime type registry
//! - [`filters`]: per-type casting filters
//! - [`args`]: argument schemas and the validator
//! - [`query`]: named queries with validated arguments
//! - [`telemetry`]: logging setup
//! - [`config`]: file and environment configuration

#![doc(html_root_url = "https://docs.rs/sieve/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;

pub use sieve_args as args;
pub use sieve_config as config;
pub use sieve_core as core;
pub use sieve_filters as filters;
pub use sieve_query as query;
pub use sieve_telemetry as telemetry;
pub use sieve_types as types;

pub use engine::{init_logging, EngineError, Sieve, SieveBuilder};

/// Everyday types.
pub mod prelude {
    pub use crate::{EngineError, Sieve, SieveBuilder};
    pub use sieve_args::{ArgDefinition, ArgSpec, ArgumentSchema, ArgumentValidator};
    pub use sieve_config::{ConfigLoader, SieveConfig};
    pub use sieve_core::{
        Arguments, BuiltinType, Entity, EntityClass, EntityId, EntityStore, SieveError,
        SieveResult, TypeId, TypeSpec, Value,
    };
    pub use sieve_filters::{Filter, FilterOptions, FilterRegistry};
    pub use sieve_query::{QueryError, QueryRegistry, QueryResult};
    pub use sieve_types::{TypeRegistration, TypeRegistry};
}
