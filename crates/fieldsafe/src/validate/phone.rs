//! Phone number validation, normalised to E.164.

use common::FieldValidationResult;
use thiserror::Error;

/// Digits in a North American number without the country code.
const NANP_LEN: usize = 10;

/// E.164 allows at most 15 digits including the country code.
const INTL_MIN_DIGITS: usize = 8;
const INTL_MAX_DIGITS: usize = 15;

/// Reasons a phone number is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("Phone number is required")]
    Required,

    #[error("Phone number contains invalid characters")]
    InvalidCharacters,

    #[error("Phone number must be 10 digits or international format (+country code)")]
    InvalidLength,

    #[error("Phone number has an invalid area code")]
    InvalidAreaCode,

    #[error("Phone number has an invalid exchange code")]
    InvalidExchange,
}

/// Validate a phone number and return its E.164 form on success.
pub fn validate_phone(input: &str) -> FieldValidationResult {
    match normalize_phone(input) {
        Ok(e164) => FieldValidationResult::valid(e164),
        Err(e) => FieldValidationResult::invalid(e.to_string()),
    }
}

/// Normalise `input` to E.164 (`+15551234567`, `+447911123456`).
///
/// Spaces, dashes, dots and parentheses are accepted as separators; `+` only
/// as the first character.
///
/// # Errors
///
/// Returns the first [`PhoneError`] encountered.
pub fn normalize_phone(input: &str) -> Result<String, PhoneError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Required);
    }

    let (international, body) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if !body.chars().all(is_phone_char) {
        return Err(PhoneError::InvalidCharacters);
    }

    let digits: String = body.chars().filter(char::is_ascii_digit).collect();

    if international {
        if let Some(national) = digits.strip_prefix('1') {
            return nanp(national);
        }
        let len_ok = (INTL_MIN_DIGITS..=INTL_MAX_DIGITS).contains(&digits.len());
        if !len_ok || digits.starts_with('0') {
            return Err(PhoneError::InvalidLength);
        }
        return Ok(format!("+{digits}"));
    }

    let national = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == NANP_LEN + 1 => rest,
        _ => digits.as_str(),
    };
    nanp(national)
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')')
}

fn nanp(national: &str) -> Result<String, PhoneError> {
    if national.len() != NANP_LEN {
        return Err(PhoneError::InvalidLength);
    }
    let bytes = national.as_bytes();
    if !(b'2'..=b'9').contains(&bytes[0]) {
        return Err(PhoneError::InvalidAreaCode);
    }
    if !(b'2'..=b'9').contains(&bytes[3]) {
        return Err(PhoneError::InvalidExchange);
    }
    Ok(format!("+1{national}"))
}
