//! Declarative argument definitions.
//!
//! [`ArgDefinition`] is the serde shape of an argument as it appears in
//! configuration files. `type`, `element_type` and `value_type` accept a
//! symbolic tag (`"integer"`), an entity identifier (`{ class = "User" }`)
//! or, for the two container options, a nested definition carrying its own
//! `type`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sieve_core::{SieveError, SieveResult, TypeSpec, Value};
use sieve_filters::FilterOptions;

use crate::schema::{ArgSpec, ArgumentSchema};

/// Serialized declaration of one argument.
///
/// # Example
///
/// ```
/// use sieve_args::ArgDefinition;
///
/// let definition: ArgDefinition = serde_json::from_str(
///     r#"{ "type": "array", "element_type": "integer", "optional": true }"#,
/// ).unwrap();
///
/// let spec = definition.to_spec().unwrap();
/// assert!(spec.is_optional());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgDefinition {
    /// Declared type.
    #[serde(rename = "type")]
    pub type_spec: serde_json::Value,

    /// Whether the argument may be omitted.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Value injected when the argument is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Element type of a sequence argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<serde_json::Value>,

    /// Value type of a mapping argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<serde_json::Value>,

    /// Entity class name of a record argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ArgDefinition {
    /// Creates a definition of the given type with no other options.
    pub fn new(type_spec: impl Into<TypeSpec>) -> Self {
        Self {
            type_spec: type_spec.into().to_json(),
            optional: false,
            default: None,
            description: None,
            element_type: None,
            value_type: None,
            class: None,
        }
    }

    /// Converts the definition into an argument declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::InvalidFilterType`] when a type is neither a tag
    /// nor a `{ class = ... }` identifier.
    pub fn to_spec(&self) -> SieveResult<ArgSpec> {
        Ok(ArgSpec::from(self.to_options()?))
    }

    fn to_options(&self) -> SieveResult<FilterOptions> {
        let mut options = FilterOptions::new(TypeSpec::from_json(&self.type_spec)?)
            .optional(self.optional);
        if let Some(default) = &self.default {
            options.default = Some(Value::from(default.clone()));
        }
        if let Some(description) = &self.description {
            options = options.description(description.clone());
        }
        if let Some(element) = &self.element_type {
            options = options.element(nested_options(element)?);
        }
        if let Some(value) = &self.value_type {
            options = options.values(nested_options(value)?);
        }
        if let Some(class) = &self.class {
            options = options.class(class.clone());
        }
        Ok(options)
    }
}

fn nested_options(raw: &serde_json::Value) -> SieveResult<FilterOptions> {
    match raw {
        serde_json::Value::Object(fields) if fields.contains_key("type") => {
            let definition: ArgDefinition = serde_json::from_value(raw.clone())
                .map_err(|err| SieveError::invalid_filter_type(err.to_string()))?;
            definition.to_options()
        }
        _ => Ok(FilterOptions::new(TypeSpec::from_json(raw)?)),
    }
}

impl From<&FilterOptions> for ArgDefinition {
    fn from(options: &FilterOptions) -> Self {
        Self {
            type_spec: options.type_spec.to_json(),
            optional: options.optional,
            default: options
                .default
                .as_ref()
                .and_then(|value| serde_json::to_value(value).ok()),
            description: options.description.clone(),
            element_type: options.element.as_deref().map(nested_json),
            value_type: options.value.as_deref().map(nested_json),
            class: options.class.as_ref().map(|class| class.name().to_string()),
        }
    }
}

impl From<&ArgSpec> for ArgDefinition {
    fn from(spec: &ArgSpec) -> Self {
        Self::from(spec.options())
    }
}

// Bare types render as the type itself, anything richer as a nested object.
fn nested_json(options: &FilterOptions) -> serde_json::Value {
    if *options == FilterOptions::new(options.type_spec.clone()) {
        return options.type_spec.to_json();
    }
    serde_json::to_value(ArgDefinition::from(options))
        .unwrap_or_else(|_| options.type_spec.to_json())
}

/// Converts a serialized schema into an [`ArgumentSchema`].
///
/// # Errors
///
/// Returns the first conversion error.
pub fn schema_from_definitions(
    definitions: &IndexMap<String, ArgDefinition>,
) -> SieveResult<ArgumentSchema> {
    definitions
        .iter()
        .map(|(name, definition)| -> SieveResult<(String, ArgSpec)> {
            Ok((name.clone(), definition.to_spec()?))
        })
        .collect()
}

/// Renders a schema as serialized definitions, in declaration order.
#[must_use]
pub fn schema_definitions(schema: &ArgumentSchema) -> IndexMap<String, ArgDefinition> {
    schema
        .iter()
        .map(|(name, spec)| (name.to_string(), ArgDefinition::from(spec)))
        .collect()
}
