//! Type coercion for bound parameter values.
//!
//! Coercion targets are a closed enum resolved at binder construction, so
//! the request path never switches on type names. String sources (query/form
//! parameters, path variables) and JSON sources (request bodies) share the
//! same target set.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt;

use crate::error::BindError;

/// Declared coercion target of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceTarget {
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Boolean; recognizes `1/yes/y/true` and `0/no/n/false` case-insensitively
    Boolean,
    /// Plain text, passed through
    Text,
    /// Date or date-time; RFC 3339 first, then common unzoned formats
    DateTime,
    /// Structured value: JSON where parseable, otherwise the raw string
    Structured,
}

impl fmt::Display for CoerceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoerceTarget::Integer => "integer",
            CoerceTarget::Float => "float",
            CoerceTarget::Boolean => "boolean",
            CoerceTarget::Text => "text",
            CoerceTarget::DateTime => "date-time",
            CoerceTarget::Structured => "structured",
        };
        write!(f, "{}", name)
    }
}

/// A coerced parameter value, ready for handler consumption.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    DateTime(NaiveDateTime),
    Structured(Value),
}

impl BoundValue {
    /// The value as JSON, cloning where necessary.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            BoundValue::Integer(i) => Value::from(*i),
            BoundValue::Float(f) => Value::from(*f),
            BoundValue::Boolean(b) => Value::from(*b),
            BoundValue::Text(s) => Value::from(s.clone()),
            BoundValue::DateTime(dt) => Value::from(dt.to_string()),
            BoundValue::Structured(v) => v.clone(),
        }
    }
}

impl TryFrom<&BoundValue> for i64 {
    type Error = anyhow::Error;

    fn try_from(value: &BoundValue) -> Result<Self, Self::Error> {
        match value {
            BoundValue::Integer(i) => Ok(*i),
            other => Err(anyhow::anyhow!("expected an integer value, got {other:?}")),
        }
    }
}

impl TryFrom<&BoundValue> for f64 {
    type Error = anyhow::Error;

    fn try_from(value: &BoundValue) -> Result<Self, Self::Error> {
        match value {
            BoundValue::Float(f) => Ok(*f),
            BoundValue::Integer(i) => Ok(*i as f64),
            other => Err(anyhow::anyhow!("expected a float value, got {other:?}")),
        }
    }
}

impl TryFrom<&BoundValue> for bool {
    type Error = anyhow::Error;

    fn try_from(value: &BoundValue) -> Result<Self, Self::Error> {
        match value {
            BoundValue::Boolean(b) => Ok(*b),
            other => Err(anyhow::anyhow!("expected a boolean value, got {other:?}")),
        }
    }
}

impl TryFrom<&BoundValue> for String {
    type Error = anyhow::Error;

    fn try_from(value: &BoundValue) -> Result<Self, Self::Error> {
        match value {
            BoundValue::Text(s) => Ok(s.clone()),
            other => Err(anyhow::anyhow!("expected a text value, got {other:?}")),
        }
    }
}

impl TryFrom<&BoundValue> for NaiveDateTime {
    type Error = anyhow::Error;

    fn try_from(value: &BoundValue) -> Result<Self, Self::Error> {
        match value {
            BoundValue::DateTime(dt) => Ok(*dt),
            other => Err(anyhow::anyhow!("expected a date-time value, got {other:?}")),
        }
    }
}

impl TryFrom<&BoundValue> for Value {
    type Error = anyhow::Error;

    fn try_from(value: &BoundValue) -> Result<Self, Self::Error> {
        Ok(value.to_json())
    }
}

/// Coerce a raw string (query/form parameter or path variable) to `target`.
pub(crate) fn coerce_str(
    name: &str,
    raw: &str,
    target: CoerceTarget,
) -> Result<BoundValue, BindError> {
    match target {
        CoerceTarget::Integer => raw
            .trim()
            .parse::<i64>()
            .map(BoundValue::Integer)
            .map_err(|_| coercion_error(name, raw, target)),
        CoerceTarget::Float => raw
            .trim()
            .parse::<f64>()
            .map(BoundValue::Float)
            .map_err(|_| coercion_error(name, raw, target)),
        CoerceTarget::Boolean => parse_boolean(raw)
            .map(BoundValue::Boolean)
            .ok_or_else(|| coercion_error(name, raw, target)),
        CoerceTarget::Text => Ok(BoundValue::Text(raw.to_string())),
        CoerceTarget::DateTime => parse_datetime(raw)
            .map(BoundValue::DateTime)
            .ok_or_else(|| coercion_error(name, raw, target)),
        CoerceTarget::Structured => Ok(BoundValue::Structured(
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        )),
    }
}

/// Coerce a JSON value (request body) to `target`.
pub(crate) fn coerce_json(
    name: &str,
    value: &Value,
    target: CoerceTarget,
) -> Result<BoundValue, BindError> {
    let fail = || coercion_error(name, &value.to_string(), target);
    match target {
        CoerceTarget::Integer => value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .map(BoundValue::Integer)
            .ok_or_else(fail),
        CoerceTarget::Float => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .map(BoundValue::Float)
            .ok_or_else(fail),
        CoerceTarget::Boolean => value
            .as_bool()
            .or_else(|| value.as_str().and_then(parse_boolean))
            .map(BoundValue::Boolean)
            .ok_or_else(fail),
        CoerceTarget::Text => match value {
            Value::String(s) => Ok(BoundValue::Text(s.clone())),
            other => Ok(BoundValue::Text(other.to_string())),
        },
        CoerceTarget::DateTime => value
            .as_str()
            .and_then(parse_datetime)
            .map(BoundValue::DateTime)
            .ok_or_else(fail),
        CoerceTarget::Structured => Ok(BoundValue::Structured(value.clone())),
    }
}

const TRUE_WORDS: [&str; 4] = ["1", "yes", "y", "true"];
const FALSE_WORDS: [&str; 4] = ["0", "no", "n", "false"];

fn parse_boolean(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if TRUE_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        return Some(true);
    }
    if FALSE_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        return Some(false);
    }
    trimmed.parse::<bool>().ok()
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn coercion_error(name: &str, value: &str, target: CoerceTarget) -> BindError {
    BindError::Coercion {
        name: name.to_string(),
        value: value.to_string(),
        target,
    }
}
