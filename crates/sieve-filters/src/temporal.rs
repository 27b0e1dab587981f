//! Date and date-time filters.
//!
//! Text is parsed against a fixed list of ISO-8601 style layouts plus a few
//! common written forms. A string carrying a UTC offset becomes a
//! [`Value::Timestamp`]; a string without one becomes a naive
//! [`Value::DateTime`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use sieve_core::{BuiltinType, SieveResult, Value};

use crate::filter::{Filter, FilterBase};
use crate::scalar::filter_struct;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parses date-time text into a timestamp or naive date-time value.
///
/// Date-only text is read as midnight.
#[must_use]
pub fn parse_date_time(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(Value::Timestamp(ts));
    }
    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(Value::Timestamp(ts));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(Value::DateTime(dt));
    }
    parse_date_only(text).map(|date| Value::DateTime(date.and_time(NaiveTime::MIN)))
}

/// Parses date text, truncating date-time text to its date.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    parse_date_only(text).or_else(|| match parse_date_time(text)? {
        Value::Timestamp(ts) => Some(ts.date_naive()),
        Value::DateTime(dt) => Some(dt.date()),
        _ => None,
    })
}

fn parse_date_only(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

filter_struct!(
    /// Accepts dates; parses text and truncates date-times.
    DateFilter
);

impl Filter for DateFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::Date.name().to_string()
    }

    // Only a plain date; a date-time is truncated rather than accepted.
    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        let date = match &value {
            Value::String(s) => parse_date(s),
            Value::DateTime(dt) => Some(dt.date()),
            Value::Timestamp(ts) => Some(ts.date_naive()),
            _ => None,
        };
        date.map(Value::Date).ok_or_else(|| self.type_error())
    }
}

filter_struct!(
    /// Accepts date-times and timestamps; parses text and widens dates.
    DateTimeFilter
);

impl Filter for DateTimeFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        BuiltinType::DateTime.name().to_string()
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::DateTime(_) | Value::Timestamp(_))
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        match &value {
            Value::String(s) => parse_date_time(s).ok_or_else(|| self.type_error()),
            Value::Date(date) => Ok(Value::DateTime(date.and_time(NaiveTime::MIN))),
            _ => Err(self.type_error()),
        }
    }
}
