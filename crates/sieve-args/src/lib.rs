//! # Sieve Args
//!
//! Argument schemas and the validation pipeline.
//!
//! An [`ArgumentSchema`] declares an operation's named arguments. The
//! [`ArgumentValidator`] checks a schema once at declaration time and then
//! normalizes every call's arguments against it:
//!
//! 1. the arguments must be a mapping
//! 2. defaults are injected for absent required arguments
//! 3. missing and then unknown names are rejected
//! 4. each value is coerced, by its own `coerce`, a registered type coercer
//!    or its filter, in that order of precedence
//! 5. arguments that were not supplied come back as null
//!
//! Schemas can also be loaded from configuration through [`ArgDefinition`].

#![doc(html_root_url = "https://docs.rs/sieve-args/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod definition;
mod schema;
mod validator;

pub use definition::{schema_definitions, schema_from_definitions, ArgDefinition};
pub use schema::{ArgCoercer, ArgSpec, ArgumentSchema};
pub use validator::ArgumentValidator;
