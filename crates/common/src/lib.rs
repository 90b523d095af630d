//! Common result types and validation errors shared across `fieldsafe` crates.

pub mod error;
pub mod protocol;

pub use error::{AmountError, FailureCategory};
pub use protocol::{AmountValidationResult, ErrorResponse, FieldValidationResult};
