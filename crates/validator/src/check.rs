//! The rule evaluator.
//!
//! [`check_value`] decides whether a single value conforms to a declared
//! [`Kind`] and [`Rule`]. Evaluation is strictly ordered: presence first,
//! then the structural type check, then the constraints in a fixed sequence,
//! stopping at the first failure. [`value_conforms`] is the advisory
//! adapter: any failure, including a configuration error, becomes `false`.
//!
//! Per-kind behavior (which structural check applies, what "length" means)
//! lives in a [`KindSpec`] dispatch table rather than a conditional chain.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use vouch_value::{Kind, Value};

use crate::error::{CheckError, CheckResult};
use crate::rule::Rule;

static MOBILE_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^1[3-9]\d{9}$").unwrap());

static EMAIL_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[\w-]+(\.[\w-]+)*@[\w-]+(\.[\w-]+)+$").unwrap());

/// Tag names whose presence fails the markup check.
const FORBIDDEN_TAGS: [&str; 3] = ["script", "iframe", "frame"];

static FORBIDDEN_TAG_SELECTORS: LazyLock<Vec<(&'static str, Selector)>> = LazyLock::new(|| {
    FORBIDDEN_TAGS
        .into_iter()
        .map(|tag| (tag, Selector::parse(tag).unwrap()))
        .collect()
});

// ============================================================================
// KIND DISPATCH
// ============================================================================

/// Per-kind behavior: the structural check, the magnitude/length accessor
/// used by bound constraints, and the mismatch message.
struct KindSpec {
    matches: fn(&Value) -> bool,
    measure: fn(&Value) -> Option<f64>,
    mismatch: &'static str,
}

fn kind_spec(kind: Kind) -> KindSpec {
    match kind {
        Kind::Boolean => KindSpec {
            matches: |v| matches!(v, Value::Bool(_)),
            measure: |_| None,
            mismatch: "value is not a boolean",
        },
        Kind::Number => KindSpec {
            // NaN carries the number shape but never conforms.
            matches: |v| matches!(v, Value::Number(n) if !n.is_nan()),
            measure: Value::as_number,
            mismatch: "value is not a number",
        },
        Kind::String => KindSpec {
            matches: |v| matches!(v, Value::String(_)),
            measure: |v| v.as_str().map(|s| s.chars().count() as f64),
            mismatch: "value is not a string",
        },
        Kind::Array => KindSpec {
            matches: |v| matches!(v, Value::Array(_)),
            measure: |v| v.as_array().map(|items| items.len() as f64),
            mismatch: "value is not an array",
        },
        Kind::Object => KindSpec {
            matches: |v| matches!(v, Value::Object(_)),
            measure: |_| None,
            mismatch: "value is not an object",
        },
        Kind::Function => KindSpec {
            matches: |v| matches!(v, Value::Function(_)),
            measure: |_| None,
            mismatch: "value is not a function",
        },
        Kind::Date => KindSpec {
            matches: |v| matches!(v, Value::Date(_)),
            measure: |_| None,
            mismatch: "value is not a date",
        },
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Checks a value against a declared kind and rule.
///
/// # Errors
///
/// [`CheckError::Invalid`] when the value fails a presence, type, or
/// constraint check; [`CheckError::Config`] when the rule itself is
/// malformed (a non-finite bound).
pub fn check_value(value: &Value, kind: Kind, rule: &Rule) -> CheckResult {
    tracing::trace!(value = %value, kind = %kind, "checking value");

    let result = match value {
        Value::Undefined => {
            if rule.allow_undefined {
                Ok(())
            } else {
                Err(CheckError::invalid("value must not be undefined"))
            }
        }
        Value::Null => {
            if rule.allow_null {
                Ok(())
            } else {
                Err(CheckError::invalid("value must not be null"))
            }
        }
        _ => check_present(value, kind, rule),
    };

    if let Err(error) = &result {
        tracing::debug!(kind = %kind, error = %error, "value check failed");
    }
    result
}

/// Advisory form of [`check_value`]: `true` on success, `false` on any
/// failure. Never panics and never propagates.
#[must_use]
pub fn value_conforms(value: &Value, kind: Kind, rule: &Rule) -> bool {
    check_value(value, kind, rule).is_ok()
}

fn check_present(value: &Value, kind: Kind, rule: &Rule) -> CheckResult {
    let spec = kind_spec(kind);
    if !(spec.matches)(value) {
        return Err(CheckError::invalid(spec.mismatch));
    }

    // An allowed empty string passes unconditionally; no other constraint
    // gets a say.
    if rule.allow_empty && kind == Kind::String && value.as_str() == Some("") {
        return Ok(());
    }

    if let Some(bound) = rule.gte {
        ensure_bound("gte", bound)?;
        if let Some(measured) = (spec.measure)(value) {
            if measured < bound {
                return Err(CheckError::invalid(format!(
                    "gte check failed: expected at least {bound}, got {measured}"
                )));
            }
        }
    }

    if let Some(bound) = rule.gt {
        ensure_bound("gt", bound)?;
        if let Some(measured) = (spec.measure)(value) {
            if measured <= bound {
                return Err(CheckError::invalid(format!(
                    "gt check failed: expected more than {bound}, got {measured}"
                )));
            }
        }
    }

    if let Some(expected) = &rule.eq {
        if value != expected {
            return Err(CheckError::invalid(format!(
                "eq check failed: {value} is not {expected}"
            )));
        }
    }

    if let Some(bound) = rule.lt {
        ensure_bound("lt", bound)?;
        if let Some(measured) = (spec.measure)(value) {
            if measured >= bound {
                return Err(CheckError::invalid(format!(
                    "lt check failed: expected less than {bound}, got {measured}"
                )));
            }
        }
    }

    if let Some(bound) = rule.lte {
        ensure_bound("lte", bound)?;
        if let Some(measured) = (spec.measure)(value) {
            if measured > bound {
                return Err(CheckError::invalid(format!(
                    "lte check failed: expected at most {bound}, got {measured}"
                )));
            }
        }
    }

    if let Some(unexpected) = &rule.ne {
        if value == unexpected {
            return Err(CheckError::invalid(format!(
                "ne check failed: value equals {unexpected}"
            )));
        }
    }

    if let Some(allowed) = &rule.list {
        if !allowed.contains(value) {
            return Err(CheckError::invalid(format!(
                "list check failed: {value} is not in the allowed set"
            )));
        }
    }

    if rule.integer {
        if let Some(n) = value.as_number() {
            if !(n.is_finite() && n.fract() == 0.0) {
                return Err(CheckError::invalid(format!(
                    "integer check failed: {n} is not a whole number"
                )));
            }
        }
    }

    if rule.mobile {
        if let Some(s) = value.as_str() {
            if !MOBILE_REGEX.is_match(s) {
                return Err(CheckError::invalid("mobile check failed"));
            }
        }
    }

    if rule.email {
        if let Some(s) = value.as_str() {
            if !EMAIL_REGEX.is_match(s) {
                return Err(CheckError::invalid("email check failed"));
            }
        }
    }

    if rule.html {
        if let Some(s) = value.as_str() {
            check_markup(s)?;
        }
    }

    if let Some(handler) = &rule.check_handler {
        if !handler(value) {
            return Err(CheckError::invalid("check_handler check failed"));
        }
    }

    Ok(())
}

/// A bound must itself conform as a number (the same non-throwing probe the
/// values go through) and be finite.
fn ensure_bound(name: &str, bound: f64) -> CheckResult {
    if !value_conforms(&Value::Number(bound), Kind::Number, &Rule::new()) || !bound.is_finite() {
        return Err(CheckError::config(format!(
            "{name} bound must be a finite number"
        )));
    }
    Ok(())
}

/// Parses the input as markup and rejects it when a blacklisted element is
/// present anywhere in the tree. Tag matching is case-insensitive through
/// the parser's normalization.
fn check_markup(input: &str) -> CheckResult {
    let fragment = Html::parse_fragment(input);
    for (tag, selector) in FORBIDDEN_TAG_SELECTORS.iter() {
        if fragment.select(selector).next().is_some() {
            return Err(CheckError::invalid(format!(
                "html check failed: {tag} tag is not allowed"
            )));
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn number(n: f64) -> Value {
        Value::Number(n)
    }

    // Presence handling

    #[rstest]
    #[case(Kind::Boolean)]
    #[case(Kind::Number)]
    #[case(Kind::String)]
    #[case(Kind::Array)]
    #[case(Kind::Object)]
    #[case(Kind::Function)]
    #[case(Kind::Date)]
    fn undefined_passes_only_when_allowed(#[case] kind: Kind) {
        assert!(check_value(&Value::Undefined, kind, &Rule::new()).is_err());
        assert!(check_value(&Value::Undefined, kind, &Rule::new().allow_undefined()).is_ok());
    }

    #[test]
    fn null_passes_only_when_allowed() {
        assert!(check_value(&Value::Null, Kind::String, &Rule::new()).is_err());
        assert!(check_value(&Value::Null, Kind::String, &Rule::new().allow_null()).is_ok());
        // allow_undefined does not cover null
        assert!(check_value(&Value::Null, Kind::String, &Rule::new().allow_undefined()).is_err());
    }

    // Type dispatch

    #[test]
    fn wrong_runtime_type_always_fails() {
        let samples = [
            Value::from(true),
            number(1.0),
            Value::from("x"),
            Value::Array(vec![]),
            Value::Object(std::collections::BTreeMap::new()),
            Value::function(|_| true),
            Value::Date(chrono::Utc::now()),
        ];
        for kind in Kind::all() {
            for sample in &samples {
                let expected = sample.kind() == Some(kind);
                assert_eq!(
                    value_conforms(sample, kind, &Rule::new()),
                    expected,
                    "sample {sample:?} against {kind}"
                );
            }
        }
    }

    #[test]
    fn nan_is_rejected_as_a_number() {
        let error = check_value(&number(f64::NAN), Kind::Number, &Rule::new()).unwrap_err();
        assert_eq!(error.to_string(), "value is not a number");
    }

    // Bounds

    #[test]
    fn gte_boundary_is_inclusive() {
        let rule = Rule::new().gte(5.0);
        assert!(value_conforms(&number(5.0), Kind::Number, &rule));
        assert!(!value_conforms(&number(4.0), Kind::Number, &rule));
    }

    #[test]
    fn gt_boundary_is_exclusive() {
        let rule = Rule::new().gt(5.0);
        assert!(!value_conforms(&number(5.0), Kind::Number, &rule));
        assert!(value_conforms(&number(6.0), Kind::Number, &rule));
    }

    #[test]
    fn bounds_measure_string_chars_and_array_elements() {
        let rule = Rule::new().gte(3.0);
        assert!(value_conforms(&Value::from("abc"), Kind::String, &rule));
        assert!(!value_conforms(&Value::from("ab"), Kind::String, &rule));
        // multibyte chars count once each
        assert!(value_conforms(&Value::from("日本語"), Kind::String, &rule));

        let short = Value::Array(vec![number(1.0)]);
        let long = Value::Array(vec![number(1.0), number(2.0), number(3.0)]);
        assert!(value_conforms(&long, Kind::Array, &rule));
        assert!(!value_conforms(&short, Kind::Array, &rule));
    }

    #[test]
    fn bounds_are_ignored_for_unmeasured_kinds() {
        let rule = Rule::new().gte(100.0);
        assert!(value_conforms(&Value::from(true), Kind::Boolean, &rule));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn non_finite_bound_is_a_configuration_error(#[case] bound: f64) {
        let error = check_value(&number(1.0), Kind::Number, &Rule::new().gte(bound)).unwrap_err();
        assert!(error.is_config());
        // and the advisory form folds it to false rather than panicking
        assert!(!value_conforms(&number(1.0), Kind::Number, &Rule::new().lte(bound)));
    }

    // Equality and membership

    #[test]
    fn eq_and_ne_are_complements() {
        for (value, probe) in [
            (number(3.0), number(3.0)),
            (number(3.0), number(4.0)),
            (Value::from("a"), Value::from("a")),
            (Value::from("a"), Value::from("b")),
        ] {
            let kind = value.kind().unwrap();
            let eq = value_conforms(&value, kind, &Rule::new().eq(probe.clone()));
            let ne = value_conforms(&value, kind, &Rule::new().ne(probe));
            assert_ne!(eq, ne);
        }
    }

    #[test]
    fn list_checks_membership() {
        let rule = Rule::new().list([number(1.0), number(2.0)]);
        assert!(value_conforms(&number(2.0), Kind::Number, &rule));
        assert!(!value_conforms(&number(3.0), Kind::Number, &rule));
    }

    // Shape constraints

    #[test]
    fn integer_rejects_fractional_numbers() {
        let rule = Rule::new().integer();
        assert!(value_conforms(&number(4.0), Kind::Number, &rule));
        assert!(!value_conforms(&number(4.5), Kind::Number, &rule));
    }

    #[rstest]
    #[case("13800000000", true)]
    #[case("19912345678", true)]
    #[case("12800000000", false)] // second digit out of range
    #[case("1380000000", false)] // ten digits
    #[case("138000000000", false)] // twelve digits
    #[case("a3800000000", false)]
    fn mobile_pattern(#[case] input: &str, #[case] expected: bool) {
        let rule = Rule::new().mobile();
        assert_eq!(
            value_conforms(&Value::from(input), Kind::String, &rule),
            expected
        );
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last@sub.example.co", true)]
    #[case("user@localhost", false)] // no dot in the domain
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("plain", false)]
    fn email_pattern(#[case] input: &str, #[case] expected: bool) {
        let rule = Rule::new().email();
        assert_eq!(
            value_conforms(&Value::from(input), Kind::String, &rule),
            expected
        );
    }

    #[rstest]
    #[case("<p>hello <b>world</b></p>", true)]
    #[case("plain text", true)]
    #[case("<script>alert(1)</script>", false)]
    #[case("<div><SCRIPT src='x'></SCRIPT></div>", false)] // case-insensitive
    #[case("<iframe src='x'></iframe>", false)]
    #[case("<frame src='x'>", false)]
    // blacklist only: other vectors are out of scope by design
    #[case("<img src=x onerror=alert(1)>", true)]
    fn html_blacklist(#[case] input: &str, #[case] expected: bool) {
        let rule = Rule::new().html();
        assert_eq!(
            value_conforms(&Value::from(input), Kind::String, &rule),
            expected
        );
    }

    #[test]
    fn check_handler_false_fails() {
        let even = Rule::new().check_handler(|v| {
            v.as_number()
                .is_some_and(|n| (n as i64).rem_euclid(2) == 0)
        });
        assert!(value_conforms(&number(4.0), Kind::Number, &even));
        assert!(!value_conforms(&number(5.0), Kind::Number, &even));
    }

    // Short circuits and ordering

    #[test]
    fn allow_empty_skips_every_other_constraint() {
        let rule = Rule::new().allow_empty().gte(5.0).mobile();
        assert!(value_conforms(&Value::from(""), Kind::String, &rule));
        // non-empty values still face the constraints
        assert!(!value_conforms(&Value::from("abc"), Kind::String, &rule));
    }

    #[test]
    fn allow_empty_is_string_only() {
        let rule = Rule::new().allow_empty().gte(5.0);
        assert!(!value_conforms(&number(1.0), Kind::Number, &rule));
    }

    #[test]
    fn first_failing_constraint_reports() {
        // gte is evaluated before mobile; its failure wins.
        let rule = Rule::new().gte(20.0).mobile();
        let error =
            check_value(&Value::from("13800000000"), Kind::String, &rule).unwrap_err();
        assert!(error.to_string().starts_with("gte check failed"));
    }

    // Presets exercised through the evaluator

    #[rstest]
    #[case(Rule::tinyint(), -128.0, true)]
    #[case(Rule::tinyint(), -129.0, false)]
    #[case(Rule::unsigned_tinyint(), 255.0, true)]
    #[case(Rule::unsigned_tinyint(), -1.0, false)]
    #[case(Rule::positive_tinyint(), 0.0, false)]
    #[case(Rule::positive_int(), 1.0, true)]
    #[case(Rule::positive_int(), 0.5, false)]
    #[case(Rule::unsigned_bigint(), 0.0, true)]
    #[case(Rule::positive_bigint(), 0.0, false)]
    #[case(Rule::positive_double(), 0.0, false)]
    #[case(Rule::positive_double(), 0.1, true)]
    fn numeric_presets(#[case] rule: Rule, #[case] input: f64, #[case] expected: bool) {
        assert_eq!(value_conforms(&number(input), Kind::Number, &rule), expected);
    }

    #[test]
    fn string_presets() {
        let long = "x".repeat(256);
        assert!(value_conforms(&Value::from(""), Kind::String, &Rule::short_string()));
        assert!(!value_conforms(&Value::from(long.as_str()), Kind::String, &Rule::short_string()));
        assert!(!value_conforms(&Value::from(""), Kind::String, &Rule::nonempty_string()));
        assert!(value_conforms(&Value::from(long.as_str()), Kind::String, &Rule::text()));
    }
}
