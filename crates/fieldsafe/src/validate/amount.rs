//! Monetary amount validation and normalisation.
//!
//! Input goes through an ordered list of named checks; the first failing check
//! decides the error. Arithmetic is decimal throughout, never binary float.

use std::str::FromStr;

use common::{AmountError, AmountValidationResult};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

/// Characters that indicate a formatted rather than raw amount.
const FORBIDDEN_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', ','];

/// Maximum number of fractional digits.
pub const MAX_DECIMAL_PLACES: usize = 2;

/// Smallest accepted amount, `0.01`.
pub fn min_amount() -> Decimal {
    Decimal::new(1, 2)
}

/// Largest accepted amount, `10000.00`.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000, 2)
}

type Check = fn(&str) -> Result<(), AmountError>;

/// Syntax checks applied, in order, to the trimmed input.
const CHECKS: &[(&str, Check)] = &[
    ("sign", check_sign),
    ("currency", check_currency),
    ("numeric", check_numeric),
    ("leading_zero", check_leading_zero),
    ("decimal_places", check_decimal_places),
];

/// Validate an untyped form value.
///
/// `null` is treated as missing; strings are used as-is; any other JSON value
/// is coerced to its JSON text (`10` becomes `"10"`).
pub fn validate(input: &Value) -> AmountValidationResult {
    match input {
        Value::Null => AmountValidationResult::invalid(AmountError::Required),
        Value::String(s) => validate_str(s),
        other => validate_str(&other.to_string()),
    }
}

/// Validate a string amount.
pub fn validate_str(input: &str) -> AmountValidationResult {
    parse_amount(input).into()
}

/// Parse and range-check `input`, returning the value and its two-decimal display form.
///
/// # Errors
///
/// Returns the first [`AmountError`] raised by the ordered checks.
pub fn parse_amount(input: &str) -> Result<(Decimal, String), AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Required);
    }

    for (name, check) in CHECKS {
        if let Err(e) = check(trimmed) {
            debug!(check = *name, "amount rejected");
            return Err(e);
        }
    }

    let value = Decimal::from_str(trimmed).map_err(|_| parse_failure(trimmed))?;
    if value < min_amount() {
        return Err(AmountError::BelowMinimum);
    }
    if value > max_amount() {
        return Err(AmountError::AboveMaximum);
    }

    Ok((value, format_two_places(value)))
}

/// Render `value` with exactly two fractional digits.
pub fn format_two_places(value: Decimal) -> String {
    let mut display = value.round_dp(MAX_DECIMAL_PLACES as u32);
    display.rescale(MAX_DECIMAL_PLACES as u32);
    display.to_string()
}

// Digits-only input that still fails to parse exceeds the decimal range, so it
// is a finite value above the maximum rather than a malformed one.
fn parse_failure(s: &str) -> AmountError {
    let (int, frac) = split_fraction(s);
    if all_digits(int) && frac.map_or(true, all_digits) {
        AmountError::AboveMaximum
    } else {
        AmountError::InvalidFormat
    }
}

fn split_fraction(s: &str) -> (&str, Option<&str>) {
    match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn check_sign(s: &str) -> Result<(), AmountError> {
    if s.starts_with('-') {
        return Err(AmountError::Negative);
    }
    Ok(())
}

fn check_currency(s: &str) -> Result<(), AmountError> {
    if s.contains(FORBIDDEN_SYMBOLS) {
        return Err(AmountError::CurrencySymbol);
    }
    Ok(())
}

fn check_numeric(s: &str) -> Result<(), AmountError> {
    let (int, frac) = split_fraction(s);
    let frac_ok = frac.map_or(true, all_digits);
    if !all_digits(int) || !frac_ok {
        return Err(AmountError::NotNumeric);
    }
    Ok(())
}

// "0" alone passes here and is caught by the minimum.
fn check_leading_zero(s: &str) -> Result<(), AmountError> {
    let bytes = s.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return Err(AmountError::LeadingZero);
    }
    Ok(())
}

fn check_decimal_places(s: &str) -> Result<(), AmountError> {
    let (_, frac) = split_fraction(s);
    match frac {
        Some(f) if f.len() > MAX_DECIMAL_PLACES => {
            let below_min = Decimal::from_str(s).map_or(false, |v| v < min_amount());
            if below_min {
                Err(AmountError::BelowMinimumWithDecimals)
            } else {
                Err(AmountError::TooManyDecimals)
            }
        }
        _ => Ok(()),
    }
}
