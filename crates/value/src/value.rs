//! The unified `Value` enum.
//!
//! This is the central type of the crate: one enum covering every shape of
//! data a validation boundary may receive, including the two absence
//! sentinels. Values are plain data constructed fresh per call; there is no
//! interning and no shared mutable state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::kind::Kind;

/// A shared callable carried by [`Value::Function`] (and by rules that accept
/// a custom predicate).
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A dynamically-typed runtime value.
///
/// `Undefined` means "absent from every source"; `Null` means "explicitly
/// null". The distinction matters to the rule engine, which can be told to
/// tolerate either one independently.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent: the value was never supplied.
    #[default]
    Undefined,
    /// Explicitly null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value. NaN is representable here but is rejected by the
    /// number type check downstream.
    Number(f64),
    /// UTF-8 text.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value mapping.
    Object(BTreeMap<String, Value>),
    /// A callable predicate, compared by pointer identity.
    Function(Predicate),
    /// A UTC timestamp.
    Date(DateTime<Utc>),
}

impl Value {
    // ==================== Constructors ====================

    /// Create a function value from any compatible closure.
    pub fn function(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    // ==================== Type queries ====================

    /// Classify this value; `None` for the absence sentinels.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        Kind::of(self)
    }

    /// True for [`Value::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// True for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when the value is neither undefined nor null.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Undefined | Self::Null)
    }

    // ==================== Accessors ====================

    /// The boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The callable, if this is a function.
    #[must_use]
    pub const fn as_function(&self) -> Option<&Predicate> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The timestamp, if this is a date.
    #[must_use]
    pub const fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

// Function payloads carry no Debug of their own; render a placeholder.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Object(map) => f.debug_tuple("Object").field(map).finish(),
            Self::Function(_) => f.write_str("Function(<fn>)"),
            Self::Date(d) => f.debug_tuple("Date").field(d).finish(),
        }
    }
}

/// Structural equality with strict-comparison semantics: `NaN != NaN`, and
/// functions compare by pointer identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            (Self::Date(a), Self::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Function(_) => f.write_str("<function>"),
            Self::Date(d) => f.write_str(&d.to_rfc3339()),
        }
    }
}
