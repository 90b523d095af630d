//! Password strength policy.
//!
//! Every unmet requirement is reported so the form can list them together.
//! The password itself is never echoed back or logged.

use common::FieldValidationResult;
use thiserror::Error;

/// Frequently breached passwords rejected regardless of composition.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd!",
    "12345678",
    "123456789",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "letmein1",
    "welcome1",
    "admin123",
    "abc12345",
];

/// A single unmet password requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordIssue {
    #[error("Password is required")]
    Required,
    #[error("Password must be at least {0} characters")]
    TooShort(usize),
    #[error("Password must be at most {0} characters")]
    TooLong(usize),
    #[error("Password must contain an uppercase letter")]
    MissingUppercase,
    #[error("Password must contain a lowercase letter")]
    MissingLowercase,
    #[error("Password must contain a number")]
    MissingDigit,
    #[error("Password must contain a special character")]
    MissingSymbol,
    #[error("Password is too common")]
    Common,
}

/// Configurable strength requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
    pub reject_common: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
            reject_common: true,
        }
    }
}

impl PasswordPolicy {
    /// Return every requirement `password` fails, in a stable order.
    ///
    /// Length is counted in characters, not bytes.
    pub fn issues(&self, password: &str) -> Vec<PasswordIssue> {
        if password.is_empty() {
            return vec![PasswordIssue::Required];
        }

        let mut issues = Vec::new();
        let len = password.chars().count();
        if len < self.min_length {
            issues.push(PasswordIssue::TooShort(self.min_length));
        }
        if len > self.max_length {
            issues.push(PasswordIssue::TooLong(self.max_length));
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            issues.push(PasswordIssue::MissingUppercase);
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            issues.push(PasswordIssue::MissingLowercase);
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            issues.push(PasswordIssue::MissingDigit);
        }
        if self.require_symbol && !password.chars().any(is_symbol) {
            issues.push(PasswordIssue::MissingSymbol);
        }
        if self.reject_common && is_common(password) {
            issues.push(PasswordIssue::Common);
        }
        issues
    }

    /// Validate `password`, joining all issues into one message.
    pub fn validate(&self, password: &str) -> FieldValidationResult {
        let issues = self.issues(password);
        if issues.is_empty() {
            return FieldValidationResult::accepted();
        }
        let message = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        FieldValidationResult::invalid(message)
    }
}

/// Validate `password` against the default [`PasswordPolicy`].
pub fn validate_password(password: &str) -> FieldValidationResult {
    PasswordPolicy::default().validate(password)
}

fn is_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

fn is_common(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|p| *p == lowered)
}
