//! # vouch-validator
//!
//! Rule-based runtime value validation and request parameter extraction.
//!
//! The core is [`check_value`]: given a dynamic [`Value`], a declared
//! [`Kind`], and a declarative [`Rule`], it decides pass or fail. On top of
//! that sit [`values_from_request`] (pull fields out of an HTTP-like request,
//! coerce, validate) and a handful of independent helpers (random
//! generation, timestamps, fixed-point conversion, delay).
//!
//! ## Quick Start
//!
//! ```rust
//! use vouch_validator::prelude::*;
//!
//! let value = Value::from(42);
//! assert!(check_value(&value, Kind::Number, &Rule::positive_int()).is_ok());
//! assert!(!value_conforms(&value, Kind::String, &Rule::new()));
//!
//! let request = Request::new().with_query("limit", "25");
//! let specs = [FieldSpec::new("limit", Kind::Number)
//!     .convert()
//!     .rule(Rule::positive_int())];
//! let values = values_from_request(&request, &specs)?;
//! assert_eq!(values["limit"], Value::from(25));
//! # Ok::<(), vouch_validator::CheckError>(())
//! ```
//!
//! ## Error model
//!
//! Every failure is a [`CheckError`]: [`CheckError::Invalid`] when the value
//! is at fault, [`CheckError::Config`] when the rule or helper arguments are.
//! Call sites choose between propagating (`?`) and advisory handling
//! ([`value_conforms`], [`values_from_request_lenient`]).
//!
//! Tracing output is emitted through the `tracing` facade at call
//! boundaries; without a subscriber installed it is a no-op.

pub mod check;
pub mod error;
pub mod prelude;
pub mod request;
pub mod rule;
pub mod util;

pub use check::{check_value, value_conforms};
pub use error::{CheckError, CheckResult};
pub use request::{
    FieldSpec, PageWindow, Request, ValueMap, page_window_from_request, values_from_request,
    values_from_request_lenient,
};
pub use rule::{MAX_SAFE_INTEGER, MIN_SAFE_INTEGER, Rule};
pub use util::{
    DEFAULT_SLEEP_MS, RandomStringOptions, fixed_to_float, float_to_fixed, random_int,
    random_string, sleep, unix_timestamp, unix_timestamp_at,
};

// Re-export the value model so most callers need only this crate.
pub use vouch_value::{Kind, Predicate, Value};
