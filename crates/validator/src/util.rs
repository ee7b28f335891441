//! Independent helpers: delay, random generation, timestamps, fixed-point
//! conversion.
//!
//! These share no state with the rule engine but validate their own
//! arguments through it, using the numeric presets.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use vouch_value::{Kind, Value};

use crate::check::{check_value, value_conforms};
use crate::error::{CheckError, CheckResult};
use crate::rule::Rule;

/// Fallback applied by [`sleep`] when the requested duration is invalid.
pub const DEFAULT_SLEEP_MS: u64 = 1000;

const LOWERCASE_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGIT_CHARS: &str = "0123456789";

/// Suspends the caller for at least `ms` milliseconds.
///
/// The duration must be a positive integer in 32-bit range; anything else
/// falls back to [`DEFAULT_SLEEP_MS`]. Resolution is best-effort: never
/// earlier than requested, with no upper bound. There is no cancellation;
/// callers needing one should race this future externally.
pub async fn sleep(ms: u64) {
    let requested = ms;
    let ms = if value_conforms(&Value::Number(ms as f64), Kind::Number, &Rule::positive_int()) {
        ms
    } else {
        tracing::debug!(requested, fallback = DEFAULT_SLEEP_MS, "invalid sleep duration");
        DEFAULT_SLEEP_MS
    };
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Uniform random integer in the inclusive range `[min, max]`.
///
/// # Errors
///
/// Both bounds must be 32-bit-range integers; `min >= max` is a
/// configuration error.
pub fn random_int(min: i64, max: i64) -> CheckResult<i64> {
    check_value(&Value::Number(min as f64), Kind::Number, &Rule::int())?;
    check_value(&Value::Number(max as f64), Kind::Number, &Rule::int())?;
    if min >= max {
        return Err(CheckError::config(format!(
            "random range is empty: min {min} >= max {max}"
        )));
    }
    Ok(rand::rng().random_range(min..=max))
}

/// Character classes available to [`random_string`]. All three built-in
/// classes are enabled by default; `other_chars` extends the alphabet.
#[derive(Debug, Clone)]
pub struct RandomStringOptions {
    lowercase: bool,
    uppercase: bool,
    number: bool,
    other_chars: String,
}

impl Default for RandomStringOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            uppercase: true,
            number: true,
            other_chars: String::new(),
        }
    }
}

impl RandomStringOptions {
    /// The default alphabet: lowercase, uppercase, and digits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables lowercase letters.
    #[must_use = "builder methods must be chained or built"]
    pub fn lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    /// Enables or disables uppercase letters.
    #[must_use = "builder methods must be chained or built"]
    pub fn uppercase(mut self, enabled: bool) -> Self {
        self.uppercase = enabled;
        self
    }

    /// Enables or disables digits.
    #[must_use = "builder methods must be chained or built"]
    pub fn number(mut self, enabled: bool) -> Self {
        self.number = enabled;
        self
    }

    /// Extends the alphabet with extra characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn other_chars(mut self, chars: impl Into<String>) -> Self {
        self.other_chars = chars.into();
        self
    }
}

/// Draws `length` characters uniformly from the configured alphabet.
///
/// # Errors
///
/// `length` must be a positive integer in 32-bit range; an empty alphabet is
/// a configuration error.
pub fn random_string(length: usize, options: &RandomStringOptions) -> CheckResult<String> {
    check_value(
        &Value::Number(length as f64),
        Kind::Number,
        &Rule::positive_int(),
    )?;

    let mut alphabet = String::new();
    if options.lowercase {
        alphabet.push_str(LOWERCASE_CHARS);
    }
    if options.uppercase {
        alphabet.push_str(UPPERCASE_CHARS);
    }
    if options.number {
        alphabet.push_str(DIGIT_CHARS);
    }
    alphabet.push_str(&options.other_chars);

    if alphabet.is_empty() {
        return Err(CheckError::config("random string alphabet is empty"));
    }

    let chars: Vec<char> = alphabet.chars().collect();
    let mut out = String::with_capacity(length);
    for _ in 0..length {
        let index = random_int(0, chars.len() as i64 - 1)?;
        out.push(chars[index as usize]);
    }
    Ok(out)
}

/// Seconds since the Unix epoch, now.
#[must_use]
pub fn unix_timestamp() -> i64 {
    unix_timestamp_at(Utc::now())
}

/// Seconds since the Unix epoch for the given instant.
#[must_use]
pub fn unix_timestamp_at(date: DateTime<Utc>) -> i64 {
    date.timestamp()
}

/// Converts a fixed-point integer back to a float by dividing by
/// `10^precision`.
///
/// # Errors
///
/// The value must be an integer in the exactly-representable `f64` range;
/// `precision` must be in `[1, 6]`.
pub fn fixed_to_float(value: i64, precision: u32) -> CheckResult<f64> {
    check_value(&Value::Number(value as f64), Kind::Number, &Rule::bigint())?;
    check_precision(precision)?;
    Ok(value as f64 / 10f64.powi(precision as i32))
}

/// Converts a float to fixed-point by multiplying by `10^precision` and
/// flooring.
///
/// # Errors
///
/// The value must be a finite float; `precision` must be in `[1, 6]`.
pub fn float_to_fixed(value: f64, precision: u32) -> CheckResult<i64> {
    check_value(&Value::Number(value), Kind::Number, &Rule::double())?;
    check_precision(precision)?;
    Ok((value * 10f64.powi(precision as i32)).floor() as i64)
}

fn check_precision(precision: u32) -> CheckResult {
    check_value(
        &Value::Number(f64::from(precision)),
        Kind::Number,
        &Rule::new().gte(1.0).lte(6.0),
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod random {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn adjacent_bounds_return_only_the_two_endpoints() {
            for _ in 0..64 {
                let n = random_int(7, 8).unwrap();
                assert!(n == 7 || n == 8);
            }
        }

        #[test]
        fn draws_stay_inside_the_range() {
            for _ in 0..256 {
                let n = random_int(-5, 5).unwrap();
                assert!((-5..=5).contains(&n));
            }
        }

        #[test]
        fn inverted_or_empty_ranges_are_configuration_errors() {
            assert!(random_int(5, 5).unwrap_err().is_config());
            assert!(random_int(10, 5).unwrap_err().is_config());
        }

        #[test]
        fn out_of_32_bit_range_bounds_are_rejected() {
            let error = random_int(i64::MIN, 0).unwrap_err();
            assert!(!error.is_config()); // the bound fails the int preset
        }

        #[test]
        fn string_uses_only_the_enabled_classes() {
            let options = RandomStringOptions::new()
                .lowercase(false)
                .uppercase(false);
            let s = random_string(64, &options).unwrap();
            assert_eq!(s.len(), 64);
            assert!(s.chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn string_honors_other_chars() {
            let options = RandomStringOptions::new()
                .lowercase(false)
                .uppercase(false)
                .number(false)
                .other_chars("-_");
            let s = random_string(32, &options).unwrap();
            assert!(s.chars().all(|c| c == '-' || c == '_'));
        }

        #[test]
        fn empty_alphabet_is_a_configuration_error() {
            let options = RandomStringOptions::new()
                .lowercase(false)
                .uppercase(false)
                .number(false);
            assert!(random_string(8, &options).unwrap_err().is_config());
        }

        #[test]
        fn zero_length_is_rejected() {
            assert!(random_string(0, &RandomStringOptions::new()).is_err());
        }
    }

    mod timestamps {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn epoch_is_zero() {
            let epoch = DateTime::from_timestamp(0, 0).unwrap();
            assert_eq!(unix_timestamp_at(epoch), 0);
        }

        #[test]
        fn now_is_after_2020() {
            assert!(unix_timestamp() > 1_577_836_800);
        }
    }

    mod fixed_point {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn cents_round_trip() {
            assert_eq!(fixed_to_float(12_345, 2).unwrap(), 123.45);
            assert_eq!(float_to_fixed(123.45, 2).unwrap(), 12_345);
        }

        #[test]
        fn conversion_floors_the_product() {
            // 1.005 * 100 is just below 100.5 in binary floating point.
            assert_eq!(float_to_fixed(1.005, 2).unwrap(), 100);
            assert_eq!(float_to_fixed(-0.015, 2).unwrap(), -2);
        }

        #[test]
        fn precision_is_bounded() {
            assert!(fixed_to_float(100, 0).is_err());
            assert!(fixed_to_float(100, 7).is_err());
            assert!(float_to_fixed(1.0, 0).is_err());
            assert!(fixed_to_float(100, 6).is_ok());
        }

        #[test]
        fn unsafe_integers_are_rejected() {
            assert!(fixed_to_float(i64::MAX, 2).is_err());
            assert!(float_to_fixed(f64::NAN, 2).is_err());
        }
    }

    mod delay {
        use pretty_assertions::assert_eq;

        use super::*;

        #[tokio::test(start_paused = true)]
        async fn resolves_no_earlier_than_requested() {
            let started = tokio::time::Instant::now();
            sleep(250).await;
            assert!(started.elapsed() >= Duration::from_millis(250));
        }

        #[tokio::test(start_paused = true)]
        async fn invalid_duration_falls_back_to_the_default() {
            let started = tokio::time::Instant::now();
            sleep(0).await;
            assert_eq!(
                started.elapsed(),
                Duration::from_millis(DEFAULT_SLEEP_MS)
            );
        }
    }
}
