//! US state code validation.

use common::FieldValidationResult;

/// USPS codes for the 50 states and the District of Columbia.
pub const STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Returns the canonical uppercase code if `input` names a state.
pub fn normalize_state_code(input: &str) -> Option<&'static str> {
    let candidate = input.trim();
    STATE_CODES
        .iter()
        .copied()
        .find(|code| code.eq_ignore_ascii_case(candidate))
}

/// Validate a two-letter state code, case-insensitively.
pub fn validate_state_code(input: &str) -> FieldValidationResult {
    if input.trim().is_empty() {
        return FieldValidationResult::invalid("State is required");
    }
    match normalize_state_code(input) {
        Some(code) => FieldValidationResult::valid(code),
        None => FieldValidationResult::invalid("Invalid state code"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut sorted = STATE_CODES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), STATE_CODES.len());
    }

    #[test]
    fn normalises_case_and_whitespace() {
        assert_eq!(normalize_state_code(" ca "), Some("CA"));
        assert_eq!(normalize_state_code("Ny"), Some("NY"));
        assert_eq!(normalize_state_code("dc"), Some("DC"));
    }

    #[test]
    fn rejects_unknown() {
        for input in ["XX", "PR", "C", "CAL", "California", "C A"] {
            assert_eq!(normalize_state_code(input), None, "{input}");
        }
    }

    #[test]
    fn result_messages() {
        assert_eq!(
            validate_state_code("").error.as_deref(),
            Some("State is required")
        );
        assert_eq!(
            validate_state_code("ZZ").error.as_deref(),
            Some("Invalid state code")
        );
        assert_eq!(validate_state_code("tx").normalized.as_deref(), Some("TX"));
    }
}
