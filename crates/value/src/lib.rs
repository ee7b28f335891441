//! # vouch-value
//!
//! The dynamic value model for the vouch validation toolkit.
//!
//! A [`Value`] can represent any input a validation boundary may see: the
//! scalars, collections, callables and dates of a loosely-typed request
//! payload, plus the two absence sentinels (`Undefined` for "not supplied
//! anywhere", `Null` for "explicitly null"). [`Kind`] is the closed
//! classification the rule engine dispatches on.
//!
//! ## Quick Start
//!
//! ```rust
//! use vouch_value::{Kind, Value};
//!
//! let v = Value::from("hello");
//! assert_eq!(Kind::of(&v), Some(Kind::String));
//! assert_eq!(v.as_str(), Some("hello"));
//!
//! // JSON payloads convert directly.
//! let v: Value = serde_json::json!({"limit": 20}).into();
//! assert_eq!(Kind::of(&v), Some(Kind::Object));
//! ```

pub mod convert;
pub mod kind;
pub mod value;

pub use convert::ConvertError;
pub use kind::Kind;
pub use value::{Predicate, Value};
