//! AES-256-GCM-SIV field encryption primitives.
//!
//! This module knows nothing about SSNs or key sources. It provides the
//! low-level encrypt/decrypt operations used by the [`crate::ssn`] codec.
//!
//! # Envelope format
//!
//! ```text
//! <base64(nonce)>:<base64(ciphertext)>:<base64(tag)>
//! ```
//!
//! Standard alphabet with padding. The nonce is 12 bytes, the tag 16 bytes.

pub mod cipher;

pub use cipher::{CipherError, Envelope};
