//! Conversions into and out of [`Value`].
//!
//! `From` impls cover the native Rust shapes; `serde_json::Value` converts in
//! both directions so request bodies parsed with serde_json drop straight
//! into extraction. The JSON round trip is lossy only where JSON itself is:
//! functions and the `Undefined` sentinel have no JSON representation, and
//! dates serialize as RFC 3339 strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::value::Value;

/// Failure converting a [`Value`] out of the dynamic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The value has no representation in the target format.
    #[error("{0} cannot be represented as JSON")]
    Unrepresentable(&'static str),
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::Number(v as f64)
            }
        }
    )*};
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Self::Object(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            // Numbers outside the f64-exact range degrade the same way any
            // f64 ingestion does.
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = ConvertError;

    fn try_from(value: Value) -> Result<Self, ConvertError> {
        Ok(match value {
            Value::Undefined => return Err(ConvertError::Unrepresentable("undefined")),
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(Self::Number)
                .ok_or(ConvertError::Unrepresentable("a non-finite number"))?,
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| Ok((key, Self::try_from(value)?)))
                    .collect::<Result<serde_json::Map<_, _>, ConvertError>>()?,
            ),
            Value::Function(_) => return Err(ConvertError::Unrepresentable("a function")),
            Value::Date(d) => Self::String(d.to_rfc3339()),
        })
    }
}
