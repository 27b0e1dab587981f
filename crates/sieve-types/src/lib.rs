//! # Sieve Types
//!
//! Pluggable type registry for the Sieve argument engine.
//!
//! This crate provides:
//!
//! - [`TypeRegistry`] - Table from [`TypeId`](sieve_core::TypeId) to validator,
//!   coercer and type handler, with a structural fallback
//! - [`TypeRegistration`] - Builder for the forms to register for one type
//! - [`TypeHandler`] - Object exposing both validation and coercion
//! - [`handlers`] - Lenient built-in handlers for strings, integers, floats
//!   and booleans
//!
//! # Example
//!
//! ```
//! use sieve_core::{BuiltinType, TypeId, Value};
//! use sieve_types::{TypeRegistration, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let integer = TypeId::from(BuiltinType::Integer);
//!
//! assert!(!registry.has_coercer(&integer));
//!
//! registry.register(
//!     integer.clone(),
//!     TypeRegistration::new().coercer(|value| match value {
//!         Value::String(s) => s.parse().map(Value::Integer).unwrap_or(Value::String(s)),
//!         other => other,
//!     }),
//! );
//!
//! assert_eq!(registry.coerce(&integer, Value::from("42")), Value::Integer(42));
//! assert!(registry.valid(&integer, &Value::Integer(42)));
//! ```

#![doc(html_root_url = "https://docs.rs/sieve-types/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod handlers;
mod registry;

pub use handlers::TypeHandler;
pub use registry::{Coercer, TypeRegistration, TypeRegistry, Validator};
