//! Result types handed back to form and API callers.
//!
//! All types serialise as camelCase JSON with absent optionals omitted, matching
//! what the web layer renders inline next to each field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AmountError, FailureCategory};

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Outcome of validating a monetary amount.
///
/// `normalized` and `formatted` are present iff `is_valid`; `error` and
/// `category` are present iff not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<Decimal>,
    /// Display form with exactly two fractional digits, e.g. `"10.00"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FailureCategory>,
}

impl AmountValidationResult {
    /// Build a successful result.
    pub fn valid(normalized: Decimal, formatted: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            normalized: Some(normalized),
            formatted: Some(formatted.into()),
            error: None,
            category: None,
        }
    }

    /// Build a failed result from a rejection reason.
    pub fn invalid(reason: AmountError) -> Self {
        Self {
            is_valid: false,
            normalized: None,
            formatted: None,
            error: Some(reason.to_string()),
            category: Some(reason.category()),
        }
    }
}

impl From<Result<(Decimal, String), AmountError>> for AmountValidationResult {
    fn from(outcome: Result<(Decimal, String), AmountError>) -> Self {
        match outcome {
            Ok((normalized, formatted)) => Self::valid(normalized, formatted),
            Err(reason) => Self::invalid(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Generic string fields
// ---------------------------------------------------------------------------

/// Outcome of validating a free-text form field (phone, password, state code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidationResult {
    pub is_valid: bool,
    /// Canonical form of the accepted input. Never populated for secrets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldValidationResult {
    /// Accepted, with a canonical value.
    pub fn valid(normalized: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            normalized: Some(normalized.into()),
            error: None,
        }
    }

    /// Accepted, with nothing safe to echo back.
    pub fn accepted() -> Self {
        Self {
            is_valid: true,
            normalized: None,
            error: None,
        }
    }

    /// Rejected with a user-facing message.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            normalized: None,
            error: Some(error.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body emitted when an operation fails outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"decryption_failed"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn valid_amount_omits_error_fields() {
        let r = AmountValidationResult::valid(Decimal::from_str("10").unwrap(), "10.00");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["formatted"], "10.00");
        assert!(json.get("error").is_none());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn invalid_amount_omits_value_fields() {
        let r = AmountValidationResult::invalid(AmountError::LeadingZero);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["category"], "leading_zero");
        assert!(json.get("normalized").is_none());
        assert!(json.get("formatted").is_none());
    }

    #[test]
    fn from_outcome() {
        let r: AmountValidationResult = Err(AmountError::Required).into();
        assert!(!r.is_valid);
        assert_eq!(r.error.as_deref(), Some("Amount is required"));
    }

    #[test]
    fn field_result_constructors() {
        assert_eq!(
            FieldValidationResult::valid("CA").normalized.as_deref(),
            Some("CA")
        );
        assert!(FieldValidationResult::accepted().normalized.is_none());
        let bad = FieldValidationResult::invalid("Invalid state code");
        assert!(!bad.is_valid);
        assert_eq!(bad.error.as_deref(), Some("Invalid state code"));
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("decryption_failed", "failed to decrypt SSN");
        assert_eq!(e.code, "decryption_failed");
        assert!(e.message.contains("decrypt"));
    }
}
