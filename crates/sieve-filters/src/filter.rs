//! The shared filter contract.
//!
//! A filter is built once per argument from its name and [`FilterOptions`]
//! and turns a caller-supplied value into the argument's canonical
//! representation. Null passes through untouched; accepted values are
//! returned as-is; anything else goes through [`Filter::cast`].

use std::fmt;

use sieve_core::{EntityClassRef, SieveError, SieveResult, TypeSpec, Value};

/// Options a filter is built with.
///
/// # Example
///
/// ```
/// use sieve_core::TypeSpec;
/// use sieve_filters::FilterOptions;
///
/// let options = FilterOptions::new("array")
///     .element_type("integer")
///     .description("Tag identifiers");
///
/// assert_eq!(options.type_spec, TypeSpec::tag("array"));
/// assert_eq!(
///     options.element.map(|e| e.type_spec),
///     Some(TypeSpec::tag("integer"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Declared type.
    pub type_spec: TypeSpec,
    /// Whether the argument may be omitted.
    pub optional: bool,
    /// Value injected when the argument is omitted.
    pub default: Option<Value>,
    /// Human-readable description.
    pub description: Option<String>,
    /// Options for each element of a sequence.
    pub element: Option<Box<FilterOptions>>,
    /// Options for each value of a mapping.
    pub value: Option<Box<FilterOptions>>,
    /// Entity class for entity references.
    pub class: Option<EntityClassRef>,
}

impl FilterOptions {
    /// Creates options for the given type.
    pub fn new(type_spec: impl Into<TypeSpec>) -> Self {
        Self {
            type_spec: type_spec.into(),
            optional: false,
            default: None,
            description: None,
            element: None,
            value: None,
            class: None,
        }
    }

    /// Marks the argument optional.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the element type for sequences.
    pub fn element_type(self, element_type: impl Into<TypeSpec>) -> Self {
        self.element(Self::new(element_type))
    }

    /// Sets the full element options for sequences, for nested containers.
    pub fn element(mut self, element: FilterOptions) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    /// Sets the value type for mappings.
    pub fn value_type(self, value_type: impl Into<TypeSpec>) -> Self {
        self.values(Self::new(value_type))
    }

    /// Sets the full value options for mappings, for nested containers.
    pub fn values(mut self, value: FilterOptions) -> Self {
        self.value = Some(Box::new(value));
        self
    }

    /// Sets the entity class for entity references.
    pub fn class(mut self, class: impl Into<EntityClassRef>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Name and options shared by every filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBase {
    name: String,
    options: FilterOptions,
}

impl FilterBase {
    /// Creates a filter base.
    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Returns the argument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Name used for the filter applied to each element of a container.
    #[must_use]
    pub fn child_name(&self) -> String {
        format!("{}[]", self.name)
    }
}

/// Per-type accept and cast strategy for one argument.
///
/// Implementors provide [`base`](Filter::base), [`type_name`](Filter::type_name),
/// [`accepts`](Filter::accepts) and [`cast`](Filter::cast); the remaining
/// methods have defaults.
pub trait Filter: fmt::Debug + Send + Sync {
    /// Returns the shared name and options.
    fn base(&self) -> &FilterBase;

    /// Type name used in error messages.
    fn type_name(&self) -> String;

    /// Returns `true` if `value` is already in the accepted representation.
    fn accepts(&self, value: &Value) -> bool;

    /// Converts a foreign representation, or fails with a type error.
    fn cast(&self, value: Value) -> SieveResult<Value>;

    /// Normalizes `value`.
    fn process(&self, value: Value) -> SieveResult<Value> {
        if value.is_null() || self.accepts(&value) {
            return Ok(value);
        }
        self.cast(value)
    }

    /// Returns the argument name.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Returns the options the filter was built with.
    fn options(&self) -> &FilterOptions {
        self.base().options()
    }

    /// Returns `true` if the argument has no default and is not optional.
    fn is_required(&self) -> bool {
        let options = self.options();
        options.default.is_none() && !options.optional
    }

    /// Returns the declared default.
    fn default_value(&self) -> Option<&Value> {
        self.options().default.as_ref()
    }

    /// Returns the declared description.
    fn description(&self) -> Option<&str> {
        self.options().description.as_deref()
    }

    /// Builds the type error for this argument.
    fn type_error(&self) -> SieveError {
        SieveError::invalid_type(self.name(), self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = FilterOptions::new("integer")
            .optional(true)
            .description("count");

        assert!(options.optional);
        assert_eq!(options.default, None);
        assert_eq!(options.description.as_deref(), Some("count"));
    }

    #[test]
    fn test_child_name() {
        let base = FilterBase::new("tags", FilterOptions::new("array"));
        assert_eq!(base.child_name(), "tags[]");
    }
}
