//! Argument schemas.
//!
//! An [`ArgumentSchema`] is the ordered set of arguments an operation
//! declares. Each argument is an [`ArgSpec`]: a declared type plus
//! optionality, default, description, container element options, entity
//! class and an optional per-argument coercion.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use sieve_core::{BuiltinType, EntityClassRef, TypeSpec, Value};
use sieve_filters::FilterOptions;

/// Per-argument coercion callback.
pub type ArgCoercer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Declaration of a single argument.
///
/// # Example
///
/// ```
/// use sieve_args::ArgSpec;
/// use sieve_core::Value;
///
/// let spec = ArgSpec::integer().default(1).description("Page number");
///
/// assert!(!spec.is_optional());
/// assert_eq!(spec.default_value(), Some(&Value::Integer(1)));
/// ```
#[derive(Clone)]
pub struct ArgSpec {
    options: FilterOptions,
    coerce: Option<ArgCoercer>,
}

impl ArgSpec {
    /// Creates a required argument of the given type.
    pub fn new(type_spec: impl Into<TypeSpec>) -> Self {
        Self {
            options: FilterOptions::new(type_spec),
            coerce: None,
        }
    }

    /// A `string` argument.
    pub fn string() -> Self {
        Self::builtin(BuiltinType::String)
    }

    /// An `integer` argument.
    pub fn integer() -> Self {
        Self::builtin(BuiltinType::Integer)
    }

    /// A `float` argument.
    pub fn float() -> Self {
        Self::builtin(BuiltinType::Float)
    }

    /// A `decimal` argument.
    pub fn decimal() -> Self {
        Self::builtin(BuiltinType::Decimal)
    }

    /// A `boolean` argument.
    pub fn boolean() -> Self {
        Self::builtin(BuiltinType::Boolean)
    }

    /// A `symbol` argument.
    pub fn symbol() -> Self {
        Self::builtin(BuiltinType::Symbol)
    }

    /// A `date` argument.
    pub fn date() -> Self {
        Self::builtin(BuiltinType::Date)
    }

    /// A `date_time` argument.
    pub fn date_time() -> Self {
        Self::builtin(BuiltinType::DateTime)
    }

    /// An `array` argument.
    pub fn array() -> Self {
        Self::builtin(BuiltinType::Array)
    }

    /// A `hash` argument.
    pub fn hash() -> Self {
        Self::builtin(BuiltinType::Hash)
    }

    /// A `record` argument referencing entities of `class`.
    pub fn record(class: impl Into<EntityClassRef>) -> Self {
        Self::new("record").class(class)
    }

    fn builtin(builtin: BuiltinType) -> Self {
        Self::new(TypeSpec::tag(builtin.tag()))
    }

    /// Marks the argument optional.
    pub fn optional(mut self) -> Self {
        self.options.optional = true;
        self
    }

    /// Sets the value used when the argument is omitted.
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.options.default = Some(default.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    /// Sets the element type of a sequence argument.
    pub fn element_type(mut self, element_type: impl Into<TypeSpec>) -> Self {
        self.options = self.options.element_type(element_type);
        self
    }

    /// Sets the full element declaration of a sequence argument.
    pub fn element(mut self, element: ArgSpec) -> Self {
        self.options = self.options.element(element.options);
        self
    }

    /// Sets the value type of a mapping argument.
    pub fn value_type(mut self, value_type: impl Into<TypeSpec>) -> Self {
        self.options = self.options.value_type(value_type);
        self
    }

    /// Sets the full value declaration of a mapping argument.
    pub fn values(mut self, value: ArgSpec) -> Self {
        self.options = self.options.values(value.options);
        self
    }

    /// Sets the entity class of a record argument.
    pub fn class(mut self, class: impl Into<EntityClassRef>) -> Self {
        self.options.class = Some(class.into());
        self
    }

    /// Sets a coercion that normalizes this argument in place of its filter.
    ///
    /// Takes precedence over any coercer registered for the type; its result
    /// is used as-is.
    pub fn coerce<F>(mut self, coerce: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.coerce = Some(Arc::new(coerce));
        self
    }

    /// Returns the declared type.
    #[must_use]
    pub fn type_spec(&self) -> &TypeSpec {
        &self.options.type_spec
    }

    /// Returns `true` if the argument may be omitted.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.options.optional
    }

    /// Returns the default, if one is present.
    ///
    /// A null default counts as absent.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.options.default.as_ref().filter(|value| !value.is_null())
    }

    /// Returns the description.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.options.description.as_deref()
    }

    /// Returns the per-argument coercion.
    #[must_use]
    pub fn coercer(&self) -> Option<&ArgCoercer> {
        self.coerce.as_ref()
    }

    /// Returns the filter options for this argument.
    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }
}

impl fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgSpec")
            .field("options", &self.options)
            .field("coerce", &self.coerce.is_some())
            .finish()
    }
}

impl From<FilterOptions> for ArgSpec {
    fn from(options: FilterOptions) -> Self {
        Self {
            options,
            coerce: None,
        }
    }
}

/// Ordered mapping from argument name to declaration.
///
/// # Example
///
/// ```
/// use sieve_args::{ArgSpec, ArgumentSchema};
///
/// let schema = ArgumentSchema::new()
///     .arg("number", ArgSpec::integer())
///     .arg("active", ArgSpec::boolean().optional());
///
/// assert_eq!(schema.names().collect::<Vec<_>>(), vec!["number", "active"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgumentSchema {
    args: IndexMap<String, ArgSpec>,
}

impl ArgumentSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, replacing any previous declaration of the name.
    pub fn arg(mut self, name: impl Into<String>, spec: ArgSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Inserts an argument in place.
    pub fn insert(&mut self, name: impl Into<String>, spec: ArgSpec) {
        self.args.insert(name.into(), spec);
    }

    /// Returns the declaration for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.args.get(name)
    }

    /// Returns `true` if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Iterates declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgSpec)> {
        self.args.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Iterates argument names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.args.keys().map(String::as_str)
    }

    /// Returns the number of declared arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if no arguments are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Names of arguments declaring both `optional` and a default.
    #[must_use]
    pub fn optional_with_default(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, spec)| spec.is_optional() && spec.default_value().is_some())
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

impl<N: Into<String>> FromIterator<(N, ArgSpec)> for ArgumentSchema {
    fn from_iter<I: IntoIterator<Item = (N, ArgSpec)>>(iter: I) -> Self {
        Self {
            args: iter
                .into_iter()
                .map(|(name, spec)| (name.into(), spec))
                .collect(),
        }
    }
}
