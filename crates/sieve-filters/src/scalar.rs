//! Scalar filters: strings, numbers, booleans and symbols.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sieve_core::{BuiltinType, SieveResult, Symbol, Value};

use crate::filter::{Filter, FilterBase};

macro_rules! filter_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: FilterBase,
        }

        impl $name {
            /// Creates the filter.
            pub fn new(base: FilterBase) -> Self {
                Self { base }
            }
        }
    };
}

pub(crate) use filter_struct;

filter_struct!(
    /// Accepts strings; every other value is stringified.
    StringFilter
);

impl Filter for StringFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::String.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        Ok(match value {
            Value::Symbol(symbol) => Value::String(symbol.into_string()),
            other => Value::String(other.to_string()),
        })
    }
}

filter_struct!(
    /// Accepts integers; parses integer text and truncates finite numbers.
    IntegerFilter
);

impl Filter for IntegerFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Integer.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Integer(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        let parsed = match &value {
            Value::String(s) => parse_integer(s),
            Value::Float(x) => truncate_float(*x),
            Value::Decimal(d) => d.trunc().to_i64(),
            _ => None,
        };
        parsed.map(Value::Integer).ok_or_else(|| self.type_error())
    }
}

filter_struct!(
    /// Accepts floats and integers; parses decimal text.
    FloatFilter
);

impl Filter for FloatFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Float.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Float(_) | Value::Integer(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        let parsed = match &value {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        };
        parsed
            .filter(|x| x.is_finite())
            .map(Value::Float)
            .ok_or_else(|| self.type_error())
    }
}

filter_struct!(
    /// Accepts decimals; converts numbers and numeric text.
    DecimalFilter
);

impl Filter for DecimalFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Decimal.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Decimal(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        let parsed = match &value {
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Float(x) if x.is_finite() => parse_decimal(&x.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        };
        parsed.map(Value::Decimal).ok_or_else(|| self.type_error())
    }
}

filter_struct!(
    /// Accepts booleans; maps `"true"`, `"1"`, numeric one and `"false"`,
    /// `"0"`, numeric zero.
    BooleanFilter
);

impl Filter for BooleanFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Boolean.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        value
            .as_flag()
            .map(Value::Bool)
            .ok_or_else(|| self.type_error())
    }
}

filter_struct!(
    /// Accepts symbols; converts strings.
    SymbolFilter
);

impl Filter for SymbolFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Symbol.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Symbol(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        match value {
            Value::String(s) => Ok(Value::Symbol(Symbol::from(s))),
            _ => Err(self.type_error()),
        }
    }
}

// Underscores are allowed as digit separators, only between two digits.
fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if !text.contains('_') {
        return text.parse().ok();
    }
    let bytes = text.as_bytes();
    let separated = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1].is_ascii_digit()
                && bytes[i + 1].is_ascii_digit())
    });
    if separated {
        text.replace('_', "").parse().ok()
    } else {
        None
    }
}

fn truncate_float(x: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64 {
        Some(x.trunc() as i64)
    } else {
        None
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
