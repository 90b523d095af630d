//! SSN envelope encryption, masking, and blind indexing.
//!
//! # Invariants
//!
//! - A plaintext SSN is exactly nine ASCII digits with no separators.
//! - Plaintext SSNs and envelopes never appear in log fields or error messages.
//! - [`SsnCodec::mask`] and [`is_envelope`] never fail; they are safe on display paths.

pub mod codec;
pub mod index;

pub use codec::{is_envelope, is_plain_ssn, SsnCodec, SsnError, MASK_FALLBACK};
