//! Query declaration and dispatch.
//!
//! Queries are declared once into a [`QueryRegistry`] under a unique name,
//! optionally with an [`ArgumentSchema`]. Calling a query looks it up,
//! validates the caller's arguments through the shared
//! [`ArgumentValidator`] and hands the normalized arguments to the body.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use sieve_args::{schema_definitions, ArgDefinition, ArgumentSchema, ArgumentValidator};
use sieve_core::{Arguments, Value};
use tracing::{debug, trace};

use crate::error::{QueryError, QueryResult};

/// Body of a query.
///
/// Closures taking the caller's scope and the normalized arguments
/// implement this, so do resolver objects.
///
/// # Example
///
/// ```
/// use sieve_core::{Arguments, Value};
/// use sieve_query::Resolver;
///
/// struct CountArgs;
///
/// impl Resolver<(), usize> for CountArgs {
///     fn resolve(&self, _scope: &(), args: &Arguments) -> anyhow::Result<usize> {
///         Ok(args.values().filter(|v| !v.is_null()).count())
///     }
/// }
///
/// let args: Arguments = [("a".to_string(), Value::Integer(1))].into_iter().collect();
/// assert_eq!(CountArgs.resolve(&(), &args).unwrap(), 1);
/// ```
pub trait Resolver<S, R>: Send + Sync {
    /// Runs the query.
    fn resolve(&self, scope: &S, args: &Arguments) -> anyhow::Result<R>;
}

impl<S, R, F> Resolver<S, R> for F
where
    F: Fn(&S, &Arguments) -> anyhow::Result<R> + Send + Sync,
{
    fn resolve(&self, scope: &S, args: &Arguments) -> anyhow::Result<R> {
        self(scope, args)
    }
}

/// A declared query.
pub struct QueryDefinition<S, R> {
    name: String,
    description: Option<String>,
    schema: Option<Arc<ArgumentSchema>>,
    resolver: Arc<dyn Resolver<S, R>>,
}

impl<S, R> QueryDefinition<S, R> {
    /// Returns the query name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the argument schema, if the query takes arguments.
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<ArgumentSchema>> {
        self.schema.as_ref()
    }

    /// Returns the introspection record for this query.
    #[must_use]
    pub fn info(&self) -> QueryInfo {
        QueryInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            args: self.schema.as_deref().map(schema_definitions),
        }
    }
}

impl<S, R> fmt::Debug for QueryDefinition<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arg_count", &self.schema.as_ref().map(|schema| schema.len()))
            .finish_non_exhaustive()
    }
}

/// Serializable description of a declared query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryInfo {
    /// Query name.
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Argument definitions, absent for argument-less queries.
    pub args: Option<IndexMap<String, ArgDefinition>>,
}

/// Table of declared queries.
///
/// `S` is the scope each call runs against and `R` the query result.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use sieve_args::{ArgSpec, ArgumentSchema, ArgumentValidator};
/// use sieve_core::{Arguments, Value};
/// use sieve_filters::FilterRegistry;
/// use sieve_query::QueryRegistry;
/// use sieve_types::TypeRegistry;
///
/// let validator = Arc::new(ArgumentValidator::new(
///     Arc::new(TypeRegistry::new()),
///     Arc::new(FilterRegistry::new()),
/// ));
/// let mut queries: QueryRegistry<Vec<i64>, Vec<i64>> = QueryRegistry::new(validator);
///
/// queries
///     .query_with_args(
///         "above",
///         "Numbers above a threshold",
///         ArgumentSchema::new().arg("min", ArgSpec::integer()),
///         |numbers: &Vec<i64>, args: &Arguments| -> anyhow::Result<Vec<i64>> {
///             let min = args["min"].as_i64().unwrap_or(0);
///             Ok(numbers.iter().copied().filter(|n| *n > min).collect())
///         },
///     )
///     .unwrap();
///
/// let given: Value = [("min", "2")].into_iter().collect();
/// assert_eq!(queries.call_with(&vec![1, 2, 3, 4], "above", given).unwrap(), vec![3, 4]);
/// ```
pub struct QueryRegistry<S, R> {
    validator: Arc<ArgumentValidator>,
    queries: IndexMap<String, QueryDefinition<S, R>>,
}

impl<S, R> QueryRegistry<S, R> {
    /// Creates an empty registry validating through `validator`.
    pub fn new(validator: Arc<ArgumentValidator>) -> Self {
        Self {
            validator,
            queries: IndexMap::new(),
        }
    }

    /// Returns the validator.
    #[must_use]
    pub fn validator(&self) -> &Arc<ArgumentValidator> {
        &self.validator
    }

    /// Declares an argument-less query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidDefinition`] for an empty name and
    /// [`QueryError::Duplicate`] for a name already declared.
    pub fn query<B>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        body: B,
    ) -> QueryResult<&QueryDefinition<S, R>>
    where
        B: Resolver<S, R> + 'static,
    {
        self.declare(name.into(), description.into(), None, Arc::new(body))
    }

    /// Declares a query taking arguments.
    ///
    /// The schema is checked and registered with the validator under the
    /// query name.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query), plus
    /// [`SchemaDefinition`](sieve_core::SieveError::SchemaDefinition) and
    /// unresolvable types from the schema check.
    pub fn query_with_args<B>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ArgumentSchema,
        body: B,
    ) -> QueryResult<&QueryDefinition<S, R>>
    where
        B: Resolver<S, R> + 'static,
    {
        self.declare(name.into(), description.into(), Some(schema), Arc::new(body))
    }

    fn declare(
        &mut self,
        name: String,
        description: String,
        schema: Option<ArgumentSchema>,
        resolver: Arc<dyn Resolver<S, R>>,
    ) -> QueryResult<&QueryDefinition<S, R>> {
        if name.trim().is_empty() {
            return Err(QueryError::invalid_definition("name must be present"));
        }
        if self.queries.contains_key(&name) {
            return Err(QueryError::Duplicate { name });
        }

        let schema = match schema {
            Some(schema) => Some(self.validator.register_schema(name.clone(), schema)?),
            None => None,
        };
        debug!(
            query = %name,
            arguments = schema.as_ref().map_or(0, |schema| schema.len()),
            "declared query"
        );

        let definition = QueryDefinition {
            name: name.clone(),
            description: Some(description).filter(|text| !text.is_empty()),
            schema,
            resolver,
        };
        let entry = self.queries.entry(name).or_insert(definition);
        Ok(&*entry)
    }

    /// Returns the query declared as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryDefinition<S, R>> {
        self.queries.get(name)
    }

    /// Calls a query without arguments.
    ///
    /// # Errors
    ///
    /// See [`call_with`](Self::call_with).
    pub fn call(&self, scope: &S, name: &str) -> QueryResult<R> {
        self.call_with(scope, name, Value::Map(Arguments::new()))
    }

    /// Validates `args` and calls the query declared as `name`.
    ///
    /// Argument-less queries reject any supplied argument as unknown.
    ///
    /// # Errors
    ///
    /// - [`QueryError::UnknownQuery`] if nothing is declared as `name`
    /// - [`QueryError::Arguments`] if validation fails
    /// - [`QueryError::Failed`] if the body fails
    pub fn call_with(&self, scope: &S, name: &str, args: impl Into<Value>) -> QueryResult<R> {
        let definition = self
            .queries
            .get(name)
            .ok_or_else(|| QueryError::unknown_query(name))?;

        let args = match &definition.schema {
            Some(schema) => self.validator.validate(name, args, schema)?,
            None => self.validator.validate(name, args, &ArgumentSchema::new())?,
        };
        trace!(query = name, "calling query");

        definition
            .resolver
            .resolve(scope, &args)
            .map_err(|source| QueryError::Failed {
                name: name.to_string(),
                source,
            })
    }

    /// Introspection records for every query, in declaration order.
    #[must_use]
    pub fn queries(&self) -> Vec<QueryInfo> {
        self.queries.values().map(QueryDefinition::info).collect()
    }

    /// Returns the number of declared queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Returns `true` if no queries are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl<S, R> fmt::Debug for QueryRegistry<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRegistry")
            .field("queries", &self.queries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_args::ArgSpec;
    use sieve_filters::FilterRegistry;
    use sieve_types::TypeRegistry;

    fn registry() -> QueryRegistry<(), String> {
        QueryRegistry::new(Arc::new(ArgumentValidator::new(
            Arc::new(TypeRegistry::new()),
            Arc::new(FilterRegistry::new()),
        )))
    }

    fn hello(_: &(), _: &Arguments) -> anyhow::Result<String> {
        Ok("hello".to_string())
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = registry().query("  ", "", hello).unwrap_err();
        assert!(matches!(err, QueryError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry();
        registry.query("hello", "", hello).unwrap();
        let err = registry.query("hello", "", hello).unwrap_err();
        assert!(matches!(err, QueryError::Duplicate { name } if name == "hello"));
    }

    #[test]
    fn test_schema_error_propagates_and_leaves_nothing_declared() {
        let mut registry = registry();
        let err = registry
            .query_with_args(
                "search",
                "",
                ArgumentSchema::new().arg("page", ArgSpec::integer().optional().default(1)),
                hello,
            )
            .unwrap_err();

        assert!(err.as_arguments().is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_argument_less_query_rejects_arguments() {
        let mut registry = registry();
        registry.query("hello", "Greets", hello).unwrap();

        assert_eq!(registry.call(&(), "hello").unwrap(), "hello");
        let given: Value = [("x", 1)].into_iter().collect();
        let err = registry.call_with(&(), "hello", given).unwrap_err();
        assert_eq!(err.to_string(), "unknown arguments for `hello`: x");
    }

    #[test]
    fn test_empty_description_is_none() {
        let mut registry = registry();
        let definition = registry.query("hello", "", hello).unwrap();
        assert_eq!(definition.description(), None);
    }
}
