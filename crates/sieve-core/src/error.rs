//! Error types for Sieve.
//!
//! This module provides the [`SieveError`] type returned by every schema,
//! filter and validation operation. Every failure is fatal for the call that
//! raised it; nothing is retried or downgraded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`SieveError`].
pub type SieveResult<T> = Result<T, SieveError>;

/// Copyable classification of a [`SieveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Optional and default declared together.
    SchemaDefinition,
    /// No schema is registered under the name.
    UnknownSchema,
    /// Call arguments were not a mapping.
    InvalidCallShape,
    /// Required arguments absent.
    MissingArguments,
    /// Undeclared arguments supplied.
    UnknownArguments,
    /// Value could not be coerced or validated.
    InvalidArgumentType,
    /// Entity lookup found nothing.
    EntityNotFound,
    /// Entity class option could not be resolved.
    UnresolvableEntityClass,
    /// The entity store was missing or failed.
    EntityStore,
    /// Unregistered filter tag.
    UnknownFilterType,
    /// Declared type is neither a tag nor a type identifier.
    InvalidFilterType,
}

/// Standard error type for Sieve.
///
/// # Example
///
/// ```
/// use sieve_core::{ErrorKind, SieveError};
///
/// let err = SieveError::invalid_type("number", "Integer");
/// assert_eq!(err.kind(), ErrorKind::InvalidArgumentType);
/// assert_eq!(err.to_string(), "argument `number` must be of type Integer");
/// ```
#[derive(Error, Debug)]
pub enum SieveError {
    /// Optional and default were declared together for one or more arguments.
    #[error("optional and default can't be declared together in `{schema}`: {}", .arguments.join(", "))]
    SchemaDefinition {
        /// The schema being declared.
        schema: String,
        /// The offending argument names.
        arguments: Vec<String>,
    },

    /// No schema is registered under the name.
    #[error("no argument schema registered as `{schema}`")]
    UnknownSchema {
        /// The requested schema name.
        schema: String,
    },

    /// The caller-supplied arguments were not a mapping.
    #[error("incorrect arguments, `{schema}` must be called as `{schema}({})`", .expected.iter().map(|name| format!("{name}: value")).collect::<Vec<_>>().join(", "))]
    InvalidCallShape {
        /// The schema being validated.
        schema: String,
        /// Declared argument names.
        expected: Vec<String>,
    },

    /// Required arguments were absent after default injection.
    #[error("arguments missing for `{schema}`: {}", .names.join(", "))]
    MissingArguments {
        /// The schema being validated.
        schema: String,
        /// Missing names, in declaration order.
        names: Vec<String>,
    },

    /// Arguments not present in the schema were supplied.
    #[error("unknown arguments for `{schema}`: {}", .names.join(", "))]
    UnknownArguments {
        /// The schema being validated.
        schema: String,
        /// Extra names, in the order the caller supplied them.
        names: Vec<String>,
    },

    /// A value could not be coerced or validated into the declared type.
    #[error("argument `{argument}` must be of type {expected}")]
    InvalidArgumentType {
        /// Argument name.
        argument: String,
        /// Expected type name.
        expected: String,
    },

    /// An entity lookup by identifier matched nothing.
    #[error("argument `{argument}`: {class} record not found with id: {id}")]
    EntityNotFound {
        /// Argument name.
        argument: String,
        /// Entity class name.
        class: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The entity class option could not be resolved to a class.
    #[error("argument `{argument}` requires a valid entity class, got `{class}`")]
    UnresolvableEntityClass {
        /// Argument name.
        argument: String,
        /// The class reference as declared.
        class: String,
    },

    /// An identifier lookup was needed but no entity store is configured.
    #[error("argument `{argument}` needs an entity store to look up {class} records")]
    EntityStoreUnavailable {
        /// Argument name.
        argument: String,
        /// Entity class name.
        class: String,
    },

    /// The entity store failed.
    #[error("entity store lookup failed for argument `{argument}`")]
    EntityStore {
        /// Argument name.
        argument: String,
        /// The store's error.
        #[source]
        source: anyhow::Error,
    },

    /// No filter is registered under the tag.
    #[error("unknown filter type: {tag}")]
    UnknownFilterType {
        /// The unregistered tag.
        tag: String,
    },

    /// The declared type is neither a tag nor a type identifier.
    #[error("invalid filter type: {description}, must be a tag or a type identifier")]
    InvalidFilterType {
        /// Rendering of the rejected declaration.
        description: String,
    },
}

impl SieveError {
    /// Creates a schema definition error.
    pub fn schema_definition(schema: impl Into<String>, arguments: Vec<String>) -> Self {
        Self::SchemaDefinition {
            schema: schema.into(),
            arguments,
        }
    }

    /// Creates an unknown-schema error.
    pub fn unknown_schema(schema: impl Into<String>) -> Self {
        Self::UnknownSchema {
            schema: schema.into(),
        }
    }

    /// Creates a type error naming the argument and the expected type.
    pub fn invalid_type(argument: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArgumentType {
            argument: argument.into(),
            expected: expected.into(),
        }
    }

    /// Creates an entity-not-found error.
    pub fn entity_not_found(
        argument: impl Into<String>,
        class: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self::EntityNotFound {
            argument: argument.into(),
            class: class.into(),
            id: id.into(),
        }
    }

    /// Creates an unresolvable-class error.
    pub fn unresolvable_class(argument: impl Into<String>, class: impl Into<String>) -> Self {
        Self::UnresolvableEntityClass {
            argument: argument.into(),
            class: class.into(),
        }
    }

    /// Creates an unknown-filter-type error.
    pub fn unknown_filter_type(tag: impl Into<String>) -> Self {
        Self::UnknownFilterType { tag: tag.into() }
    }

    /// Creates an invalid-filter-type error.
    pub fn invalid_filter_type(description: impl Into<String>) -> Self {
        Self::InvalidFilterType {
            description: description.into(),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SchemaDefinition { .. } => ErrorKind::SchemaDefinition,
            Self::UnknownSchema { .. } => ErrorKind::UnknownSchema,
            Self::InvalidCallShape { .. } => ErrorKind::InvalidCallShape,
            Self::MissingArguments { .. } => ErrorKind::MissingArguments,
            Self::UnknownArguments { .. } => ErrorKind::UnknownArguments,
            Self::InvalidArgumentType { .. } => ErrorKind::InvalidArgumentType,
            Self::EntityNotFound { .. } => ErrorKind::EntityNotFound,
            Self::UnresolvableEntityClass { .. } => ErrorKind::UnresolvableEntityClass,
            Self::EntityStoreUnavailable { .. } | Self::EntityStore { .. } => {
                ErrorKind::EntityStore
            }
            Self::UnknownFilterType { .. } => ErrorKind::UnknownFilterType,
            Self::InvalidFilterType { .. } => ErrorKind::InvalidFilterType,
        }
    }
}
