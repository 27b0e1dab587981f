//! The argument validation pipeline.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use sieve_core::{Arguments, SieveError, SieveResult, Value};
use sieve_filters::{Filter, FilterRegistry};
use sieve_types::TypeRegistry;
use tracing::{debug, trace, warn};

use crate::schema::{ArgSpec, ArgumentSchema};

/// Normalizes caller-supplied arguments against argument schemas.
///
/// The validator holds explicit handles to the [`TypeRegistry`] and the
/// [`FilterRegistry`] it consults, and keeps the schemas registered through
/// [`register_schema`](Self::register_schema). Validation itself is
/// stateless: every call builds its filters, injects defaults, checks
/// completeness and normalizes each value.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use sieve_args::{ArgSpec, ArgumentSchema, ArgumentValidator};
/// use sieve_core::Value;
/// use sieve_filters::FilterRegistry;
/// use sieve_types::TypeRegistry;
///
/// let validator = ArgumentValidator::new(
///     Arc::new(TypeRegistry::new()),
///     Arc::new(FilterRegistry::new()),
/// );
/// validator
///     .register_schema(
///         "by_number",
///         ArgumentSchema::new()
///             .arg("number", ArgSpec::integer())
///             .arg("active", ArgSpec::boolean().optional()),
///     )
///     .unwrap();
///
/// let given: Value = [("number", "5")].into_iter().collect();
/// let normalized = validator.validate_registered("by_number", given).unwrap();
///
/// assert_eq!(normalized["number"], Value::Integer(5));
/// assert_eq!(normalized["active"], Value::Null);
/// ```
pub struct ArgumentValidator {
    types: Arc<TypeRegistry>,
    filters: Arc<FilterRegistry>,
    schemas: RwLock<IndexMap<String, Arc<ArgumentSchema>>>,
}

impl ArgumentValidator {
    /// Creates a validator over the given registries.
    pub fn new(types: Arc<TypeRegistry>, filters: Arc<FilterRegistry>) -> Self {
        Self {
            types,
            filters,
            schemas: RwLock::new(IndexMap::new()),
        }
    }

    /// Returns the type registry.
    #[must_use]
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Returns the filter registry.
    #[must_use]
    pub fn filters(&self) -> &Arc<FilterRegistry> {
        &self.filters
    }

    /// Declaration-time check of a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::SchemaDefinition`] naming every argument that
    /// declares both `optional` and a default.
    pub fn check_schema(name: &str, schema: &ArgumentSchema) -> SieveResult<()> {
        let offenders = schema.optional_with_default();
        if offenders.is_empty() {
            Ok(())
        } else {
            Err(SieveError::schema_definition(name, offenders))
        }
    }

    /// Checks and stores a schema under `name`.
    ///
    /// Every declared type is resolved once so that unknown tags fail here
    /// rather than on the first call. Registering a name again replaces the
    /// previous schema.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::SchemaDefinition`] for optional arguments with
    /// a default, or the filter registry's error for an unresolvable type.
    pub fn register_schema(
        &self,
        name: impl Into<String>,
        schema: ArgumentSchema,
    ) -> SieveResult<Arc<ArgumentSchema>> {
        let name = name.into();
        Self::check_schema(&name, &schema)?;
        self.build_filters(&schema)?;

        let schema = Arc::new(schema);
        let previous = self
            .schemas
            .write()
            .insert(name.clone(), Arc::clone(&schema));
        if previous.is_some() {
            warn!(schema = %name, "replacing registered argument schema");
        }
        debug!(schema = %name, arguments = schema.len(), "registered argument schema");
        Ok(schema)
    }

    /// Returns the schema registered under `name`.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<Arc<ArgumentSchema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Names of registered schemas, in registration order.
    #[must_use]
    pub fn schema_names(&self) -> Vec<String> {
        self.schemas.read().keys().cloned().collect()
    }

    /// Validates `given` against the schema registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::UnknownSchema`] if nothing is registered under
    /// `name`, otherwise the errors of [`validate`](Self::validate).
    pub fn validate_registered(&self, name: &str, given: impl Into<Value>) -> SieveResult<Arguments> {
        let schema = self
            .schema(name)
            .ok_or_else(|| SieveError::unknown_schema(name))?;
        self.validate(name, given, &schema)
    }

    /// Validates and normalizes `given` against `schema`.
    ///
    /// The result holds exactly the schema's arguments in declaration order;
    /// optional arguments that were not supplied are null.
    ///
    /// # Errors
    ///
    /// - [`SieveError::InvalidCallShape`] if `given` is not a mapping
    /// - [`SieveError::MissingArguments`] for required arguments still absent
    ///   after default injection, in declaration order
    /// - [`SieveError::UnknownArguments`] for names outside the schema, in
    ///   the order supplied
    /// - any type or lookup error raised while normalizing a value
    pub fn validate(
        &self,
        name: &str,
        given: impl Into<Value>,
        schema: &ArgumentSchema,
    ) -> SieveResult<Arguments> {
        let Value::Map(mut given) = given.into() else {
            return Err(SieveError::InvalidCallShape {
                schema: name.to_string(),
                expected: schema.names().map(str::to_string).collect(),
            });
        };

        let filters = self.build_filters(schema)?;

        for (arg, spec) in schema.iter() {
            if spec.is_optional() || given.contains_key(arg) {
                continue;
            }
            if let Some(default) = spec.default_value() {
                given.insert(arg.to_string(), default.clone());
            }
        }

        let missing: Vec<String> = schema
            .iter()
            .filter(|(arg, spec)| !spec.is_optional() && !given.contains_key(*arg))
            .map(|(arg, _)| arg.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SieveError::MissingArguments {
                schema: name.to_string(),
                names: missing,
            });
        }

        let unknown: Vec<String> = given
            .keys()
            .filter(|key| !schema.contains(key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SieveError::UnknownArguments {
                schema: name.to_string(),
                names: unknown,
            });
        }

        let mut normalized = Arguments::with_capacity(schema.len());
        for ((arg, spec), filter) in schema.iter().zip(&filters) {
            let value = given.swap_remove(arg).unwrap_or(Value::Null);
            let value = self.normalize(arg, spec, filter.as_ref(), value)?;
            normalized.insert(arg.to_string(), value);
        }
        trace!(schema = name, arguments = normalized.len(), "validated arguments");
        Ok(normalized)
    }

    fn build_filters(&self, schema: &ArgumentSchema) -> SieveResult<Vec<Box<dyn Filter>>> {
        schema
            .iter()
            .map(|(arg, spec)| self.filters.build(arg, spec.options().clone()))
            .collect()
    }

    // Exactly one of: the argument's own coercion, the registry coercer
    // (checked with the registry validator), or the filter.
    fn normalize(
        &self,
        arg: &str,
        spec: &ArgSpec,
        filter: &dyn Filter,
        value: Value,
    ) -> SieveResult<Value> {
        if value.is_null() {
            return Ok(value);
        }

        if let Some(coerce) = spec.coercer() {
            trace!(argument = arg, "applying argument coercion");
            return Ok(coerce(value));
        }

        if let Some(type_id) = spec
            .type_spec()
            .type_id()
            .filter(|type_id| self.types.has_coercer(type_id))
        {
            trace!(argument = arg, type_id = %type_id, "applying registered coercion");
            let coerced = self.types.coerce(&type_id, value);
            if !self.types.valid(&type_id, &coerced) {
                return Err(SieveError::invalid_type(arg, type_id.name()));
            }
            return Ok(coerced);
        }

        trace!(argument = arg, filter = %filter.type_name(), "processing argument");
        filter.process(value)
    }
}

impl fmt::Debug for ArgumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentValidator")
            .field("types", &self.types)
            .field("filters", &self.filters)
            .field("schema_count", &self.schemas.read().len())
            .finish()
    }
}
