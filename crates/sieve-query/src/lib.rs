//! # Sieve Query
//!
//! Declaration and dispatch of named queries whose arguments are
//! normalized by the Sieve argument pipeline.
//!
//! A [`QueryRegistry`] is an explicit table from query name to description,
//! optional argument schema and body. Declaring a query checks its schema
//! once; calling it validates the arguments and runs the body with the
//! normalized mapping. [`QueryRegistry::queries`] lists every declaration
//! as serializable [`QueryInfo`] records.

#![doc(html_root_url = "https://docs.rs/sieve-query/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod registry;

pub use error::{QueryError, QueryResult};
pub use registry::{QueryDefinition, QueryInfo, QueryRegistry, Resolver};
