//! Form-field validators.
//!
//! All validators are pure functions of their input. They never fail outright:
//! every rejection is folded into the returned result so form callers can
//! render the message inline.

pub mod amount;
pub mod password;
pub mod phone;
pub mod state;

pub use amount::{parse_amount, validate as validate_amount, validate_str as validate_amount_str};
pub use password::{validate_password, PasswordIssue, PasswordPolicy};
pub use phone::{normalize_phone, validate_phone, PhoneError};
pub use state::{normalize_state_code, validate_state_code};
