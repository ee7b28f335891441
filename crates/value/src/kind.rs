//! Value kinds: the closed classification the rule engine dispatches on.
//!
//! Quick example:
//! ```rust
//! use vouch_value::{Kind, Value};
//!
//! let v = Value::from(3.14);
//! assert_eq!(Kind::of(&v), Some(Kind::Number));
//! assert_eq!(Kind::Number.name(), "number");
//! ```

use core::fmt::{Display, Formatter};

use crate::Value;

/// The semantic category of a present [`Value`].
///
/// The two absence sentinels (`Undefined`, `Null`) have no kind; see
/// [`Kind::of`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Boolean,
    Number,
    String,
    Array,
    Object,
    Function,
    Date,
}

impl Kind {
    /// All kinds, in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Boolean,
            Self::Number,
            Self::String,
            Self::Array,
            Self::Object,
            Self::Function,
            Self::Date,
        ]
    }

    /// Classify a value. `None` for `Undefined` and `Null`.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Undefined | Value::Null => None,
            Value::Bool(_) => Some(Self::Boolean),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::String),
            Value::Array(_) => Some(Self::Array),
            Value::Object(_) => Some(Self::Object),
            Value::Function(_) => Some(Self::Function),
            Value::Date(_) => Some(Self::Date),
        }
    }

    /// Descriptive lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Function => "function",
            Self::Date => "date",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}
