//! Sequence and mapping filters.
//!
//! When declared with an element (or value) type, the container holds a
//! child filter named `"<name>[]"` built through the
//! [`FilterRegistry`](crate::FilterRegistry) and applies it to every element.
//! Children are themselves registry-built, so containers nest freely.

use sieve_core::{Arguments, BuiltinType, SieveResult, Value};

use crate::filter::{Filter, FilterBase};

/// Accepts sequences, optionally normalizing every element.
#[derive(Debug)]
pub struct ArrayFilter {
    base: FilterBase,
    element: Option<Box<dyn Filter>>,
}

impl ArrayFilter {
    /// Creates the filter with an optional element filter.
    pub fn new(base: FilterBase, element: Option<Box<dyn Filter>>) -> Self {
        Self { base, element }
    }

    /// Returns the element filter.
    #[must_use]
    pub fn element_filter(&self) -> Option<&dyn Filter> {
        self.element.as_deref()
    }
}

impl Filter for ArrayFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Array.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Array(_))
    }

    fn cast(&self, _value: Value) -> SieveResult<Value> {
        Err(self.type_error())
    }

    fn process(&self, value: Value) -> SieveResult<Value> {
        match (value, &self.element) {
            (Value::Array(items), Some(element)) => items
                .into_iter()
                .map(|item| element.process(item))
                .collect::<SieveResult<Vec<_>>>()
                .map(Value::Array),
            (value, _) if value.is_null() || self.accepts(&value) => Ok(value),
            (value, _) => self.cast(value),
        }
    }
}

/// Accepts string-keyed mappings, optionally normalizing every value.
#[derive(Debug)]
pub struct HashFilter {
    base: FilterBase,
    value: Option<Box<dyn Filter>>,
}

impl HashFilter {
    /// Creates the filter with an optional value filter.
    pub fn new(base: FilterBase, value: Option<Box<dyn Filter>>) -> Self {
        Self { base, value }
    }

    /// Returns the value filter.
    #[must_use]
    pub fn value_filter(&self) -> Option<&dyn Filter> {
        self.value.as_deref()
    }
}

impl Filter for HashFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Hash.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_))
    }

    fn cast(&self, _value: Value) -> SieveResult<Value> {
        Err(self.type_error())
    }

    fn process(&self, value: Value) -> SieveResult<Value> {
        match (value, &self.value) {
            (Value::Map(entries), Some(filter)) => entries
                .into_iter()
                .map(|(key, item)| filter.process(item).map(|item| (key, item)))
                .collect::<SieveResult<Arguments>>()
                .map(Value::Map),
            (value, _) if value.is_null() || self.accepts(&value) => Ok(value),
            (value, _) => self.cast(value),
        }
    }
}
