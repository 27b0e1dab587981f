//! Type handlers.
//!
//! A [`TypeHandler`] bundles validation and coercion for one logical type.
//! The built-in handlers are lenient: `coerce` returns its input unchanged
//! when it cannot convert it, and `valid` is a strict representation check.
//! Pairing them (coerce, then check) rejects what could not be converted.

use rust_decimal::prelude::ToPrimitive;
use sieve_core::{BuiltinType, Value};

/// Validation and coercion for one logical type.
pub trait TypeHandler: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns `true` if `value` is in the type's canonical representation.
    fn valid(&self, value: &Value) -> bool;

    /// Converts `value` towards the canonical representation.
    fn coerce(&self, value: Value) -> Value {
        value
    }
}

/// Strings; every value has a string form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl TypeHandler for StringType {
    fn name(&self) -> &str {
        BuiltinType::String.name()
    }

    fn valid(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn coerce(&self, value: Value) -> Value {
        match value {
            Value::String(_) => value,
            Value::Symbol(symbol) => Value::String(symbol.into_string()),
            other => Value::String(other.to_string()),
        }
    }
}

/// Integers; base-10 text is parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

impl TypeHandler for IntegerType {
    fn name(&self) -> &str {
        BuiltinType::Integer.name()
    }

    fn valid(&self, value: &Value) -> bool {
        matches!(value, Value::Integer(_))
    }

    fn coerce(&self, value: Value) -> Value {
        match value {
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::String(s),
            },
            other => other,
        }
    }
}

/// Floats; text and integers are widened.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl TypeHandler for FloatType {
    fn name(&self) -> &str {
        BuiltinType::Float.name()
    }

    fn valid(&self, value: &Value) -> bool {
        matches!(value, Value::Float(_))
    }

    fn coerce(&self, value: Value) -> Value {
        match value {
            Value::Integer(i) => Value::Float(i as f64),
            Value::Decimal(d) => d.to_f64().map_or(value, Value::Float),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Value::Float(x),
                _ => Value::String(s),
            },
            other => other,
        }
    }
}

/// Booleans; `"true"`, `"1"` and `1` are true, `"false"`, `"0"` and `0` false.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl TypeHandler for BooleanType {
    fn name(&self) -> &str {
        BuiltinType::Boolean.name()
    }

    fn valid(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    fn coerce(&self, value: Value) -> Value {
        value.as_flag().map_or(value, Value::Bool)
    }
}
