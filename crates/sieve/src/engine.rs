//! The assembled validation engine.

use std::fmt;
use std::sync::Arc;

use sieve_args::{ArgumentSchema, ArgumentValidator};
use sieve_config::{ConfigError, SieveConfig};
use sieve_core::{Arguments, EntityStore, SieveError, SieveResult, Value};
use sieve_filters::FilterRegistry;
use sieve_query::QueryRegistry;
use sieve_telemetry::{log_rejected_arguments, TelemetryError};
use sieve_types::TypeRegistry;
use thiserror::Error;
use tracing::info;

/// Errors raised while assembling an engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A schema declared in code was rejected.
    #[error(transparent)]
    Schema(#[from] SieveError),

    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Installs logging as described by `config.logging`.
///
/// # Errors
///
/// Returns [`EngineError::Telemetry`] if the level directive is invalid or
/// a global subscriber is already installed.
pub fn init_logging(config: &SieveConfig) -> Result<(), EngineError> {
    sieve_telemetry::init_logging(&config.logging.to_log_config())?;
    Ok(())
}

/// Registries, validator and declared schemas, ready to validate calls.
///
/// # Example
///
/// ```
/// use sieve::prelude::*;
///
/// let sieve = Sieve::builder()
///     .schema("named", ArgumentSchema::new().arg("name", ArgSpec::string().default("x")))
///     .build()
///     .unwrap();
///
/// let normalized = sieve.validate("named", Value::Map(Arguments::new())).unwrap();
/// assert_eq!(normalized["name"], Value::from("x"));
/// ```
#[derive(Clone)]
pub struct Sieve {
    validator: Arc<ArgumentValidator>,
}

impl Sieve {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> SieveBuilder {
        SieveBuilder::new()
    }

    /// Assembles an engine from configuration alone.
    ///
    /// # Errors
    ///
    /// See [`SieveBuilder::build`].
    pub fn from_config(config: &SieveConfig) -> Result<Self, EngineError> {
        Self::builder().config(config.clone()).build()
    }

    /// Validates `args` against the schema registered as `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::UnknownSchema`] for an unregistered name, or any
    /// validation error.
    pub fn validate(&self, schema: &str, args: impl Into<Value>) -> SieveResult<Arguments> {
        self.validator
            .validate_registered(schema, args)
            .map_err(|err| {
                log_rejected_arguments!(schema, err);
                err
            })
    }

    /// Declares a schema after assembly.
    ///
    /// # Errors
    ///
    /// As [`ArgumentValidator::register_schema`].
    pub fn register_schema(
        &self,
        name: impl Into<String>,
        schema: ArgumentSchema,
    ) -> SieveResult<Arc<ArgumentSchema>> {
        self.validator.register_schema(name, schema)
    }

    /// Creates an empty query table validating through this engine.
    #[must_use]
    pub fn query_registry<S, R>(&self) -> QueryRegistry<S, R> {
        QueryRegistry::new(Arc::clone(&self.validator))
    }

    /// Returns the validator.
    #[must_use]
    pub fn validator(&self) -> &Arc<ArgumentValidator> {
        &self.validator
    }

    /// Returns the type registry.
    #[must_use]
    pub fn type_registry(&self) -> &Arc<TypeRegistry> {
        self.validator.types()
    }

    /// Returns the filter registry.
    #[must_use]
    pub fn filter_registry(&self) -> &Arc<FilterRegistry> {
        self.validator.filters()
    }
}

impl fmt::Debug for Sieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sieve")
            .field("schemas", &self.validator.schema_names())
            .field("type_registrations", &self.type_registry().len())
            .finish()
    }
}

/// Builder for [`Sieve`].
#[derive(Default)]
pub struct SieveBuilder {
    config: SieveConfig,
    store: Option<Arc<dyn EntityStore>>,
    types: Option<Arc<TypeRegistry>>,
    filters: Option<FilterRegistry>,
    schemas: Vec<(String, ArgumentSchema)>,
}

impl SieveBuilder {
    /// Creates a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` for registry options and declared schemas.
    #[must_use]
    pub fn config(mut self, config: SieveConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the store record arguments are looked up in.
    #[must_use]
    pub fn entity_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses a prepared type registry instead of a fresh one.
    #[must_use]
    pub fn type_registry(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    /// Uses a prepared filter registry instead of the built-in one.
    #[must_use]
    pub fn filter_registry(mut self, filters: FilterRegistry) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Declares a schema in code.
    ///
    /// Code schemas are registered after configured ones and replace them on
    /// a name clash.
    #[must_use]
    pub fn schema(mut self, name: impl Into<String>, schema: ArgumentSchema) -> Self {
        self.schemas.push((name.into(), schema));
        self
    }

    /// Assembles the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for invalid configured schemas and
    /// [`EngineError::Schema`] for code schemas that fail registration.
    pub fn build(self) -> Result<Sieve, EngineError> {
        let configured = self.config.argument_schemas()?;

        let types = self.types.unwrap_or_else(|| Arc::new(TypeRegistry::new()));
        if self.config.registry.builtin_type_handlers {
            types.register_builtin_handlers();
        }

        let mut filters = self.filters.unwrap_or_default();
        if let Some(store) = self.store {
            filters = filters.with_entity_store(store);
        }

        let validator = ArgumentValidator::new(types, Arc::new(filters));
        for (name, schema) in configured {
            validator
                .register_schema(name.clone(), schema)
                .map_err(|source| ConfigError::schema(name, source))?;
        }
        for (name, schema) in self.schemas {
            validator.register_schema(name, schema)?;
        }

        info!(
            schemas = validator.schema_names().len(),
            builtin_type_handlers = self.config.registry.builtin_type_handlers,
            "sieve engine ready"
        );
        Ok(Sieve {
            validator: Arc::new(validator),
        })
    }
}

impl fmt::Debug for SieveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveBuilder")
            .field("config", &self.config)
            .field("has_entity_store", &self.store.is_some())
            .field("code_schemas", &self.schemas.len())
            .finish_non_exhaustive()
    }
}
