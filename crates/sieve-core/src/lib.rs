//! # Sieve Core
//!
//! Core types shared by every Sieve crate.
//!
//! This crate provides the foundational types used throughout Sieve:
//!
//! - [`Value`] - Dynamic argument value, with [`Value::Null`] as the "no value" marker
//! - [`Arguments`] - Ordered argument mapping handed to and returned by validation
//! - [`TypeId`] / [`TypeSpec`] - Type identifiers and declared argument types
//! - [`Entity`] / [`EntityStore`] - Entity references and the lookup contract
//!   the persistence layer implements
//! - [`SieveError`] - Standard error type

#![doc(html_root_url = "https://docs.rs/sieve-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod entity;
mod error;
pub mod fixtures;
mod types;
mod value;

pub use entity::{Entity, EntityClass, EntityClassRef, EntityId, EntityStore};
pub use error::{ErrorKind, SieveError, SieveResult};
pub use types::{BuiltinType, TypeId, TypeSpec};
pub use value::{Arguments, Symbol, Value};
