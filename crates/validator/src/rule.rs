//! Declarative rules and the preset catalogue.
//!
//! A [`Rule`] is a flat set of optional constraints applied to a value of a
//! known [`Kind`](vouch_value::Kind). Constraints are independent; the
//! evaluator ANDs them together in a fixed order. Rules are built fluently,
//! and presets compose by overlay: a later builder call wins, so
//! `Rule::tinyint().gte(0.0)` is the unsigned variant of the signed base.
//!
//! ```rust
//! use vouch_validator::Rule;
//!
//! let quantity = Rule::positive_int();
//! let comment = Rule::text().allow_empty();
//! let status = Rule::new().list([1.into(), 2.into(), 3.into()]);
//! ```

use std::fmt;
use std::sync::Arc;

use vouch_value::{Predicate, Value};

/// Largest integer magnitude exactly representable in an `f64`, `2^53 - 1`.
/// The `bigint` preset family bounds itself here.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Negative counterpart of [`MAX_SAFE_INTEGER`].
pub const MIN_SAFE_INTEGER: f64 = -MAX_SAFE_INTEGER;

/// A flat, single-level constraint set.
///
/// Bound-style constraints (`gte`/`gt`/`lt`/`lte`) compare the numeric value
/// for numbers and the length for strings (chars) and arrays (elements);
/// they are ignored for kinds with no magnitude notion. Each bound must
/// itself be a finite number; a non-finite bound is reported as a
/// configuration error, not a value failure.
#[derive(Clone, Default)]
pub struct Rule {
    pub(crate) allow_undefined: bool,
    pub(crate) allow_null: bool,
    pub(crate) allow_empty: bool,
    pub(crate) gte: Option<f64>,
    pub(crate) gt: Option<f64>,
    pub(crate) lt: Option<f64>,
    pub(crate) lte: Option<f64>,
    pub(crate) eq: Option<Value>,
    pub(crate) ne: Option<Value>,
    pub(crate) list: Option<Vec<Value>>,
    pub(crate) integer: bool,
    pub(crate) mobile: bool,
    pub(crate) email: bool,
    pub(crate) html: bool,
    pub(crate) check_handler: Option<Predicate>,
}

impl Rule {
    /// An empty rule: only the presence and type checks apply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Presence ====================

    /// Tolerate an undefined value, bypassing every other check.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_undefined(mut self) -> Self {
        self.allow_undefined = true;
        self
    }

    /// Tolerate an explicit null, bypassing every other check.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// For string values: accept `""` unconditionally, skipping the
    /// remaining constraints.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    // ==================== Bounds ====================

    /// Inclusive lower bound on the value's magnitude or length.
    #[must_use = "builder methods must be chained or built"]
    pub fn gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    /// Exclusive lower bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn gt(mut self, bound: f64) -> Self {
        self.gt = Some(bound);
        self
    }

    /// Exclusive upper bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn lt(mut self, bound: f64) -> Self {
        self.lt = Some(bound);
        self
    }

    /// Inclusive upper bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }

    // ==================== Equality and membership ====================

    /// Require strict equality with the given value.
    #[must_use = "builder methods must be chained or built"]
    pub fn eq(mut self, expected: impl Into<Value>) -> Self {
        self.eq = Some(expected.into());
        self
    }

    /// Require strict inequality with the given value.
    #[must_use = "builder methods must be chained or built"]
    pub fn ne(mut self, unexpected: impl Into<Value>) -> Self {
        self.ne = Some(unexpected.into());
        self
    }

    /// Require membership in the given set of values.
    #[must_use = "builder methods must be chained or built"]
    pub fn list(mut self, allowed: impl IntoIterator<Item = Value>) -> Self {
        self.list = Some(allowed.into_iter().collect());
        self
    }

    // ==================== Shape ====================

    /// For numbers: require a whole number.
    #[must_use = "builder methods must be chained or built"]
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// For strings: require an 11-digit mobile number (`1` followed by
    /// `3`-`9`, then nine digits).
    #[must_use = "builder methods must be chained or built"]
    pub fn mobile(mut self) -> Self {
        self.mobile = true;
        self
    }

    /// For strings: require a plausible email address (local part, `@`,
    /// domain with at least one dot). Deliberately not full RFC 5322.
    #[must_use = "builder methods must be chained or built"]
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    /// For strings: reject markup containing `script`, `iframe`, or `frame`
    /// elements anywhere in the parsed tree.
    ///
    /// This is a tag blacklist, not a sanitizer: event-handler attributes,
    /// `javascript:` URLs and every other vector pass through unchecked.
    #[must_use = "builder methods must be chained or built"]
    pub fn html(mut self) -> Self {
        self.html = true;
        self
    }

    /// Run a caller-supplied predicate over the value; returning `false`
    /// fails the check.
    #[must_use = "builder methods must be chained or built"]
    pub fn check_handler(mut self, handler: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.check_handler = Some(Arc::new(handler));
        self
    }

    // ==================== Integer presets ====================

    /// Signed 8-bit integer.
    #[must_use]
    pub fn tinyint() -> Self {
        Self::new().gte(-128.0).lte(127.0).integer()
    }

    /// Unsigned 8-bit integer.
    #[must_use]
    pub fn unsigned_tinyint() -> Self {
        Self::tinyint().gte(0.0).lte(255.0)
    }

    /// Unsigned 8-bit integer, at least 1.
    #[must_use]
    pub fn positive_tinyint() -> Self {
        Self::unsigned_tinyint().gte(1.0)
    }

    /// Signed 32-bit integer.
    #[must_use]
    pub fn int() -> Self {
        Self::new()
            .gte(-2_147_483_648.0)
            .lte(2_147_483_647.0)
            .integer()
    }

    /// Unsigned 32-bit integer.
    #[must_use]
    pub fn unsigned_int() -> Self {
        Self::int().gte(0.0).lte(4_294_967_295.0)
    }

    /// Unsigned 32-bit integer, at least 1.
    #[must_use]
    pub fn positive_int() -> Self {
        Self::unsigned_int().gte(1.0)
    }

    /// Integer within the exactly-representable `f64` range.
    #[must_use]
    pub fn bigint() -> Self {
        Self::new()
            .gte(MIN_SAFE_INTEGER)
            .lte(MAX_SAFE_INTEGER)
            .integer()
    }

    /// Non-negative [`bigint`](Self::bigint).
    #[must_use]
    pub fn unsigned_bigint() -> Self {
        Self::bigint().gte(0.0)
    }

    /// [`bigint`](Self::bigint) of at least 1.
    #[must_use]
    pub fn positive_bigint() -> Self {
        Self::unsigned_bigint().gte(1.0)
    }

    // ==================== Float presets ====================

    /// Any finite float.
    #[must_use]
    pub fn double() -> Self {
        Self::new().gte(f64::MIN).lte(f64::MAX)
    }

    /// Non-negative finite float.
    #[must_use]
    pub fn unsigned_double() -> Self {
        Self::double().gte(0.0)
    }

    /// Strictly positive finite float.
    #[must_use]
    pub fn positive_double() -> Self {
        Self::unsigned_double().gt(0.0)
    }

    // ==================== String presets ====================

    /// String of at most 255 chars.
    #[must_use]
    pub fn short_string() -> Self {
        Self::new().gte(0.0).lte(255.0)
    }

    /// String of 1 to 255 chars.
    #[must_use]
    pub fn nonempty_string() -> Self {
        Self::short_string().gte(1.0)
    }

    /// String of at most 65535 chars.
    #[must_use]
    pub fn text() -> Self {
        Self::new().gte(0.0).lte(65_535.0)
    }

    /// String of 1 to 65535 chars.
    #[must_use]
    pub fn nonempty_text() -> Self {
        Self::text().gte(1.0)
    }
}

// The predicate has no Debug of its own; render its presence.
impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("allow_undefined", &self.allow_undefined)
            .field("allow_null", &self.allow_null)
            .field("allow_empty", &self.allow_empty)
            .field("gte", &self.gte)
            .field("gt", &self.gt)
            .field("lt", &self.lt)
            .field("lte", &self.lte)
            .field("eq", &self.eq)
            .field("ne", &self.ne)
            .field("list", &self.list)
            .field("integer", &self.integer)
            .field("mobile", &self.mobile)
            .field("email", &self.email)
            .field("html", &self.html)
            .field("check_handler", &self.check_handler.is_some())
            .finish()
    }
}
