//! Convenience re-exports for the common path.
//!
//! ```rust
//! use vouch_validator::prelude::*;
//!
//! let rule = Rule::nonempty_string().email();
//! assert!(check_value(&Value::from("a@b.co"), Kind::String, &rule).is_ok());
//! ```

pub use crate::check::{check_value, value_conforms};
pub use crate::error::{CheckError, CheckResult};
pub use crate::request::{
    FieldSpec, PageWindow, Request, ValueMap, page_window_from_request, values_from_request,
    values_from_request_lenient,
};
pub use crate::rule::Rule;
pub use crate::util::{
    RandomStringOptions, fixed_to_float, float_to_fixed, random_int, random_string, sleep,
    unix_timestamp, unix_timestamp_at,
};
pub use vouch_value::{Kind, Predicate, Value};
