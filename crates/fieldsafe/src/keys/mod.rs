//! Symmetric key sources for the SSN codec.
//!
//! # Lifecycle
//!
//! 1. The codec is constructed with an explicit [`KeySource`].
//! 2. Every encrypt/decrypt/index call asks the source for the current
//!    hex-encoded key and decodes it into a short-lived [`KeyBytes`].
//! 3. Rotating the key (changing the environment variable, or calling
//!    [`KeyStore::rotate`]) takes effect on the next call. Nothing is cached
//!    inside the codec.
//!
//! # Security invariants
//!
//! - Key material is never logged or included in error messages; logs carry
//!   [`KeyBytes::fingerprint`] only.

pub mod bytes;
pub mod store;

pub use bytes::KeyBytes;
pub use store::KeyStore;

use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Environment variable read by default for the hex-encoded key.
pub const DEFAULT_KEY_VAR: &str = "ENCRYPTION_KEY";

/// Errors produced when resolving key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    /// No key is configured.
    #[error("encryption key is not configured")]
    Missing,

    /// The configured key does not decode to [`KEY_LEN`] bytes.
    #[error("encryption key must be 32 bytes (64 hex characters)")]
    InvalidLength,
}

/// Supplies the current hex-encoded symmetric key.
///
/// Implementations are consulted on every codec call and must be cheap.
#[cfg_attr(test, mockall::automock)]
pub trait KeySource: Send + Sync {
    /// Return the current key as hex, or `None` if no key is configured.
    fn key_hex(&self) -> Option<String>;
}

/// Reads the key from a process environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    /// Read the key from the environment variable named `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable this source reads.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_VAR)
    }
}

impl KeySource for EnvKeySource {
    fn key_hex(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// A fixed key, for embedding callers and tests.
#[derive(Clone)]
pub struct StaticKeySource(String);

impl StaticKeySource {
    pub fn new(key_hex: impl Into<String>) -> Self {
        Self(key_hex.into())
    }
}

impl std::fmt::Debug for StaticKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticKeySource([REDACTED])")
    }
}

impl KeySource for StaticKeySource {
    fn key_hex(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Generate a fresh random key, hex-encoded.
pub fn generate_key_hex() -> String {
    use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    let encoded = hex::encode(key);
    key.iter_mut().for_each(|b| *b = 0);
    encoded
}
