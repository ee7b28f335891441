//! Error type for validation failures.
//!
//! One catchable category, two explicit kinds: [`CheckError::Invalid`] for
//! values that fail a presence, type, or constraint check, and
//! [`CheckError::Config`] for rules or helper arguments that are themselves
//! malformed. Callers that want an advisory answer instead of an error use
//! [`value_conforms`](crate::check::value_conforms) or the lenient extraction
//! variants, which map both kinds to a benign default.
//!
//! Messages use `Cow<'static, str>` so the common static reasons allocate
//! nothing.

use std::borrow::Cow;

/// Result alias used across the crate.
pub type CheckResult<T = ()> = Result<T, CheckError>;

/// A validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The checked value failed a presence, type, or constraint check.
    #[error("{}", render(.reason, .field))]
    Invalid {
        /// Human-readable reason naming the failed check.
        reason: Cow<'static, str>,
        /// The originating request field, when known.
        field: Option<String>,
    },

    /// The rule or helper arguments were malformed; the checked value was
    /// never at fault.
    #[error("configuration error: {reason}")]
    Config {
        /// Human-readable reason naming the malformed argument.
        reason: Cow<'static, str>,
    },
}

fn render(reason: &str, field: &Option<String>) -> String {
    match field {
        Some(name) => format!("[{name}] {reason}"),
        None => reason.to_owned(),
    }
}

impl CheckError {
    /// Creates a value failure.
    pub fn invalid(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Invalid {
            reason: reason.into(),
            field: None,
        }
    }

    /// Creates a configuration failure.
    pub fn config(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Attaches the originating field name. Configuration failures are left
    /// untouched; they describe the rule, not the value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        if let Self::Invalid { field, .. } = &mut self {
            *field = Some(name.into());
        }
        self
    }

    /// The originating field, when one was attached.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => field.as_deref(),
            Self::Config { .. } => None,
        }
    }

    /// True for configuration failures.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
