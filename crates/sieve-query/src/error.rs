//! Query declaration and dispatch errors.

use sieve_core::SieveError;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised when declaring or calling queries.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The declaration itself is malformed.
    #[error("invalid query definition: {reason}")]
    InvalidDefinition {
        /// What is wrong with the declaration.
        reason: String,
    },

    /// A query with this name is already declared.
    #[error("query `{name}` is already declared")]
    Duplicate {
        /// The query name.
        name: String,
    },

    /// No query is declared under this name.
    #[error("no query declared as `{name}`")]
    UnknownQuery {
        /// The requested name.
        name: String,
    },

    /// The argument schema was rejected or the arguments failed validation.
    #[error(transparent)]
    Arguments(#[from] SieveError),

    /// The query body failed.
    #[error("query `{name}` failed")]
    Failed {
        /// The query name.
        name: String,
        /// The body's error.
        #[source]
        source: anyhow::Error,
    },
}

impl QueryError {
    /// Creates an invalid definition error.
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            reason: reason.into(),
        }
    }

    /// Creates an unknown query error.
    pub fn unknown_query(name: impl Into<String>) -> Self {
        Self::UnknownQuery { name: name.into() }
    }

    /// Returns the argument error, if this is one.
    #[must_use]
    pub fn as_arguments(&self) -> Option<&SieveError> {
        match self {
            Self::Arguments(err) => Some(err),
            _ => None,
        }
    }
}
