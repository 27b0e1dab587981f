//! The top-level [`SieveConfig`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sieve_args::{schema_from_definitions, ArgDefinition, ArgumentSchema, ArgumentValidator};
use sieve_telemetry::create_env_filter;

use crate::{ConfigError, ConfigResult, LogFormat, LoggingConfig, RegistryConfig, SchemaDefinitions};

/// Complete Sieve configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use sieve_config::SieveConfig;
///
/// let config: SieveConfig = toml::from_str(r#"
///     [schemas.by_number.number]
///     type = "integer"
///
///     [schemas.by_number.active]
///     type = "boolean"
///     optional = true
/// "#).unwrap();
///
/// let schemas = config.argument_schemas().unwrap();
/// assert_eq!(schemas["by_number"].len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SieveConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registry initialisation.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Declared argument schemas.
    #[serde(default)]
    pub schemas: SchemaDefinitions,
}

impl SieveConfig {
    /// Adds a schema declaration.
    #[must_use]
    pub fn with_schema(
        mut self,
        name: impl Into<String>,
        arguments: IndexMap<String, ArgDefinition>,
    ) -> Self {
        self.schemas.insert(name.into(), arguments);
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidValue`] if `logging.level` is not a valid
    ///   filter directive
    /// - [`ConfigError::Schema`] if a schema has an unparsable type or
    ///   declares an optional argument with a default
    pub fn validate(&self) -> ConfigResult<()> {
        if self.logging.enabled {
            create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }
        self.argument_schemas().map(|_| ())
    }

    /// Converts every declared schema, checking each one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Schema`] for the first schema that fails to
    /// convert or to pass the declaration check.
    pub fn argument_schemas(&self) -> ConfigResult<IndexMap<String, ArgumentSchema>> {
        self.schemas
            .iter()
            .map(|(name, definitions)| -> ConfigResult<(String, ArgumentSchema)> {
                let schema = schema_from_definitions(definitions)
                    .map_err(|source| ConfigError::schema(name.clone(), source))?;
                ArgumentValidator::check_schema(name, &schema)
                    .map_err(|source| ConfigError::schema(name.clone(), source))?;
                Ok((name.clone(), schema))
            })
            .collect()
    }

    /// Development preset: pretty logs with per-argument tracing.
    ///
    /// # Example
    ///
    /// ```
    /// use sieve_config::{LogFormat, SieveConfig};
    ///
    /// let config = SieveConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// assert!(config.validate().is_ok());
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "sieve=debug,sieve_args=trace,info".to_string(),
                format: LogFormat::Pretty,
                span_events: true,
                include_location: true,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production preset: JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Json,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SieveConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.registry.builtin_type_handlers);
        assert!(config.schemas.is_empty());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = SieveConfig::production();
        config.logging.level = "sieve=[".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "logging.level"));

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_with_default_schema_rejected() {
        let mut page = ArgDefinition::new("integer");
        page.optional = true;
        page.default = Some(serde_json::json!(1));
        let config = SieveConfig::default()
            .with_schema("search", [("page".to_string(), page)].into_iter().collect());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Schema { schema, .. } if schema == "search"));
    }

    #[test]
    fn test_bad_type_rejected() {
        let config: SieveConfig = toml::from_str(
            r#"
            [schemas.broken.n]
            type = 5
            "#,
        )
        .unwrap();
        assert!(config.argument_schemas().is_err());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<SieveConfig, _> = toml::from_str("[server]\nport = 1");
        assert!(result.is_err());
    }
}
