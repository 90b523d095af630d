//! Validation failure taxonomy shared across crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a validation failure.
///
/// Form callers use this to pick an inline hint without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Nothing was supplied.
    Required,
    /// Characters or structure the field does not accept.
    Format,
    /// A numeric value padded with unnecessary zeros.
    LeadingZero,
    /// Too many fractional digits.
    DecimalPlaces,
    /// Outside the accepted minimum/maximum.
    Range,
    /// A sign where only positive values are accepted.
    Positive,
}

/// Reasons a monetary amount is rejected.
///
/// The display strings are the user-facing messages rendered next to the form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Missing, null, or whitespace-only input.
    #[error("Amount is required")]
    Required,

    /// Input starts with a minus sign.
    #[error("Amount must be positive")]
    Negative,

    /// Input contains `$ € £ ¥` or a thousands separator.
    #[error("Amount must not contain currency symbols or commas")]
    CurrencySymbol,

    /// Input is not `digits[.digits]`.
    #[error("Amount must contain numeric characters only")]
    NotNumeric,

    /// Input such as `00`, `01` or `00.50`.
    #[error("Amount must not have leading zeros")]
    LeadingZero,

    /// More than two fractional digits.
    #[error("Amount can have at most 2 decimal places")]
    TooManyDecimals,

    /// More than two fractional digits and below the minimum.
    #[error("Amount must be at least $0.01 and have at most 2 decimal places")]
    BelowMinimumWithDecimals,

    /// Syntactically valid but not representable as a decimal.
    #[error("Invalid amount format")]
    InvalidFormat,

    /// Below `0.01`.
    #[error("Amount must be at least $0.01")]
    BelowMinimum,

    /// Above `10000.00`.
    #[error("Amount cannot exceed $10,000.00")]
    AboveMaximum,
}

impl AmountError {
    /// Returns the [`FailureCategory`] this rejection belongs to.
    pub fn category(&self) -> FailureCategory {
        match self {
            AmountError::Required => FailureCategory::Required,
            AmountError::Negative => FailureCategory::Positive,
            AmountError::CurrencySymbol | AmountError::NotNumeric | AmountError::InvalidFormat => {
                FailureCategory::Format
            }
            AmountError::LeadingZero => FailureCategory::LeadingZero,
            AmountError::TooManyDecimals | AmountError::BelowMinimumWithDecimals => {
                FailureCategory::DecimalPlaces
            }
            AmountError::BelowMinimum | AmountError::AboveMaximum => FailureCategory::Range,
        }
    }
}
