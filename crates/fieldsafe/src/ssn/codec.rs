//! [`SsnCodec`]: encrypt, decrypt, mask, and index Social Security Numbers.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::index::keyed_index;
use crate::crypto::cipher::{self, is_base64_segment, split_segments, CipherError, Envelope};
use crate::keys::{EnvKeySource, KeyBytes, KeyError, KeySource};

/// Display value used whenever a real mask cannot be derived.
pub const MASK_FALLBACK: &str = "XXX-XX-XXXX";

const MASK_PREFIX: &str = "XXX-XX-";

/// Number of digits in a plaintext SSN.
pub const SSN_LEN: usize = 9;

/// Errors returned by [`SsnCodec`].
///
/// Messages never contain the SSN, the envelope, or key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SsnError {
    /// The plaintext is not exactly nine digits.
    #[error("SSN must be exactly {SSN_LEN} digits")]
    InvalidFormat,

    /// No key is configured.
    #[error("encryption key is not configured")]
    MissingKey,

    /// The configured key does not decode to 32 bytes.
    #[error("encryption key must be 32 bytes (64 hex characters)")]
    InvalidKeyLength,

    /// The value is not `iv:ciphertext:tag`.
    #[error("encrypted SSN must have the form iv:ciphertext:tag")]
    InvalidEnvelopeFormat,

    /// Authentication failed or a segment could not be decoded.
    #[error("failed to decrypt SSN")]
    DecryptionFailed,

    /// Internal AEAD failure while encrypting.
    #[error("failed to encrypt SSN")]
    EncryptionFailed,
}

impl SsnError {
    /// Short machine-readable code for error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SsnError::InvalidFormat => "invalid_format",
            SsnError::MissingKey => "missing_key",
            SsnError::InvalidKeyLength => "invalid_key_length",
            SsnError::InvalidEnvelopeFormat => "invalid_envelope_format",
            SsnError::DecryptionFailed => "decryption_failed",
            SsnError::EncryptionFailed => "encryption_failed",
        }
    }
}

impl From<KeyError> for SsnError {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::Missing => SsnError::MissingKey,
            KeyError::InvalidLength => SsnError::InvalidKeyLength,
        }
    }
}

/// Returns `true` if `value` is exactly nine ASCII digits.
pub fn is_plain_ssn(value: &str) -> bool {
    value.len() == SSN_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `true` if `value` looks like an encrypted envelope.
///
/// Syntactic only: exactly three non-empty, base64-decodable segments. A value
/// that passes may still fail to decrypt.
pub fn is_envelope(value: &str) -> bool {
    match split_segments(value) {
        Some((iv, ct, tag)) => {
            is_base64_segment(iv) && is_base64_segment(ct) && is_base64_segment(tag)
        }
        None => false,
    }
}

/// Stateless SSN codec bound to a [`KeySource`].
///
/// The key is requested from the source on every fallible call, so rotation
/// takes effect immediately. Cloning is cheap.
#[derive(Clone)]
pub struct SsnCodec {
    keys: Arc<dyn KeySource>,
}

impl SsnCodec {
    /// Create a codec reading its key from `keys`.
    pub fn new(keys: Arc<dyn KeySource>) -> Self {
        Self { keys }
    }

    /// Create a codec reading its key from the environment variable `var`.
    pub fn from_env(var: impl Into<String>) -> Self {
        Self::new(Arc::new(EnvKeySource::new(var)))
    }

    fn current_key(&self) -> Result<KeyBytes, SsnError> {
        let hex_key = self.keys.key_hex();
        KeyBytes::from_source(hex_key.as_deref()).map_err(|e| {
            warn!(error = %e, "SSN key unavailable");
            SsnError::from(e)
        })
    }

    /// Encrypt a nine-digit SSN into an `iv:ciphertext:tag` envelope.
    ///
    /// Every call draws a fresh nonce, so repeated calls on the same SSN
    /// return different envelopes.
    ///
    /// # Errors
    ///
    /// [`SsnError::InvalidFormat`], [`SsnError::MissingKey`],
    /// [`SsnError::InvalidKeyLength`], or [`SsnError::EncryptionFailed`].
    pub fn encrypt(&self, ssn: &str) -> Result<String, SsnError> {
        if !is_plain_ssn(ssn) {
            return Err(SsnError::InvalidFormat);
        }
        let key = self.current_key()?;
        let envelope = cipher::encrypt(ssn.as_bytes(), key.as_bytes()).map_err(|e| match e {
            CipherError::InvalidKeyLength => SsnError::InvalidKeyLength,
            _ => SsnError::EncryptionFailed,
        })?;
        debug!(key = %key.fingerprint(), "SSN encrypted");
        Ok(envelope.to_string_repr())
    }

    /// Decrypt an envelope produced by [`SsnCodec::encrypt`].
    ///
    /// # Errors
    ///
    /// [`SsnError::InvalidEnvelopeFormat`] if the value does not have three
    /// segments; [`SsnError::MissingKey`] / [`SsnError::InvalidKeyLength`] for
    /// key problems; [`SsnError::DecryptionFailed`] for anything else.
    pub fn decrypt(&self, envelope: &str) -> Result<String, SsnError> {
        if split_segments(envelope).is_none() {
            return Err(SsnError::InvalidEnvelopeFormat);
        }
        let key = self.current_key()?;

        let parsed = Envelope::parse(envelope).map_err(|_| SsnError::DecryptionFailed)?;
        let plaintext = cipher::decrypt(&parsed, key.as_bytes()).map_err(|_| {
            warn!(key = %key.fingerprint(), "SSN envelope failed authentication");
            SsnError::DecryptionFailed
        })?;

        String::from_utf8(plaintext).map_err(|_| SsnError::DecryptionFailed)
    }

    /// Display mask `XXX-XX-1234` for a plaintext SSN or an envelope.
    ///
    /// Never fails: anything that is not a plain SSN and does not decrypt to
    /// one yields [`MASK_FALLBACK`].
    pub fn mask(&self, value: &str) -> String {
        if is_plain_ssn(value) {
            return mask_digits(value);
        }
        if !is_envelope(value) {
            return MASK_FALLBACK.to_owned();
        }
        match self.decrypt(value) {
            Ok(ssn) if is_plain_ssn(&ssn) => mask_digits(&ssn),
            Ok(_) => MASK_FALLBACK.to_owned(),
            Err(e) => {
                debug!(error = %e, "masking fell back");
                MASK_FALLBACK.to_owned()
            }
        }
    }

    /// Returns `true` if `value` looks like an envelope. See [`is_envelope`].
    pub fn is_envelope(&self, value: &str) -> bool {
        is_envelope(value)
    }

    /// Deterministic keyed index of an SSN for equality lookup.
    ///
    /// Unlike [`SsnCodec::encrypt`] the output is stable for a given key, so
    /// callers can store it alongside the envelope and search by it.
    ///
    /// # Errors
    ///
    /// Same precondition and key errors as [`SsnCodec::encrypt`].
    pub fn blind_index(&self, ssn: &str) -> Result<String, SsnError> {
        if !is_plain_ssn(ssn) {
            return Err(SsnError::InvalidFormat);
        }
        let key = self.current_key()?;
        Ok(keyed_index(key.as_bytes(), ssn.as_bytes()))
    }
}

impl std::fmt::Debug for SsnCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsnCodec").finish_non_exhaustive()
    }
}

fn mask_digits(ssn: &str) -> String {
    format!("{MASK_PREFIX}{}", &ssn[SSN_LEN - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyStore, MockKeySource, StaticKeySource};
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    const KEY_A: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const KEY_B: &str = "1f1e1d1c1b1a191817161514131211100f0e0d0c0b0a09080706050403020100";

    fn codec(key: &str) -> SsnCodec {
        SsnCodec::new(Arc::new(StaticKeySource::new(key)))
    }

    #[test]
    fn round_trip() {
        let c = codec(KEY_A);
        for ssn in ["123456789", "000000000", "987654321"] {
            let env = c.encrypt(ssn).unwrap();
            assert_eq!(c.decrypt(&env).unwrap(), ssn);
        }
    }

    #[test]
    fn repeated_encryption_differs() {
        let c = codec(KEY_A);
        assert_ne!(c.encrypt("123456789").unwrap(), c.encrypt("123456789").unwrap());
    }

    #[test]
    fn envelope_has_three_base64_segments() {
        let env = codec(KEY_A).encrypt("123456789").unwrap();
        let parts: Vec<&str> = env.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(STANDARD.decode(parts[0]).unwrap().len(), 12);
        assert_eq!(STANDARD.decode(parts[2]).unwrap().len(), 16);
        assert!(!env.contains("123456789"));
    }

    #[test]
    fn encrypt_rejects_bad_format() {
        let c = codec(KEY_A);
        for bad in ["12345678", "1234567890", "123-45-6789", "12345678a", "", "１２３４５６７８９"] {
            assert_eq!(c.encrypt(bad), Err(SsnError::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn format_error_does_not_echo_value() {
        let err = codec(KEY_A).encrypt("12345678").unwrap_err();
        assert!(!err.to_string().contains("12345678"));
    }

    #[test]
    fn missing_key() {
        let c = SsnCodec::new(Arc::new(KeyStore::new()));
        assert_eq!(c.encrypt("123456789"), Err(SsnError::MissingKey));
        assert_eq!(codec("").encrypt("123456789"), Err(SsnError::MissingKey));
    }

    #[test]
    fn invalid_key_length() {
        assert_eq!(
            codec("abcd").encrypt("123456789"),
            Err(SsnError::InvalidKeyLength)
        );
        let env = codec(KEY_A).encrypt("123456789").unwrap();
        assert_eq!(codec("abcd").decrypt(&env), Err(SsnError::InvalidKeyLength));
    }

    #[test]
    fn decrypt_rejects_wrong_segment_count() {
        let c = codec(KEY_A);
        for bad in ["", "abc", "a:b", "a:b:c:d", "123456789"] {
            assert_eq!(c.decrypt(bad), Err(SsnError::InvalidEnvelopeFormat), "{bad}");
        }
    }

    #[test]
    fn segment_count_checked_before_key() {
        let c = SsnCodec::new(Arc::new(KeyStore::new()));
        assert_eq!(c.decrypt("a:b"), Err(SsnError::InvalidEnvelopeFormat));
    }

    #[test]
    fn decrypt_rejects_bad_base64() {
        assert_eq!(
            codec(KEY_A).decrypt("!!!:???:***"),
            Err(SsnError::DecryptionFailed)
        );
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let c = codec(KEY_A);
        let env = c.encrypt("123456789").unwrap();
        let parts: Vec<&str> = env.split(':').collect();
        let mut ct = STANDARD.decode(parts[1]).unwrap();
        ct[0] ^= 0x01;
        let tampered = format!("{}:{}:{}", parts[0], STANDARD.encode(ct), parts[2]);
        assert_eq!(c.decrypt(&tampered), Err(SsnError::DecryptionFailed));
    }

    #[test]
    fn wrong_key_fails() {
        let env = codec(KEY_A).encrypt("123456789").unwrap();
        assert_eq!(codec(KEY_B).decrypt(&env), Err(SsnError::DecryptionFailed));
    }

    #[test]
    fn mask_plain_and_encrypted() {
        let c = codec(KEY_A);
        assert_eq!(c.mask("123456789"), "XXX-XX-6789");
        let env = c.encrypt("123456789").unwrap();
        assert_eq!(c.mask(&env), "XXX-XX-6789");
    }

    #[test]
    fn mask_falls_back_on_anything_malformed() {
        let c = codec(KEY_A);
        let env = c.encrypt("123456789").unwrap();
        let undecryptable = codec(KEY_B).encrypt("123456789").unwrap();
        for bad in [
            "",
            "1234",
            "123-45-6789",
            "1234567890",
            "a:b",
            "!!!:???:***",
            &env[..env.len() - 4],
            undecryptable.as_str(),
        ] {
            assert_eq!(c.mask(bad), MASK_FALLBACK, "{bad}");
        }
    }

    #[test]
    fn mask_without_key_falls_back_for_envelopes_only() {
        let env = codec(KEY_A).encrypt("123456789").unwrap();
        let keyless = SsnCodec::new(Arc::new(KeyStore::new()));
        assert_eq!(keyless.mask(&env), MASK_FALLBACK);
        assert_eq!(keyless.mask("123456789"), "XXX-XX-6789");
    }

    #[test]
    fn mask_rejects_decrypted_non_ssn() {
        let key = KeyBytes::from_hex(KEY_A).unwrap();
        let env = cipher::encrypt(b"hello", key.as_bytes())
            .unwrap()
            .to_string_repr();
        assert_eq!(codec(KEY_A).mask(&env), MASK_FALLBACK);
    }

    #[test]
    fn is_envelope_is_syntactic() {
        let c = codec(KEY_A);
        let env = c.encrypt("123456789").unwrap();
        assert!(c.is_envelope(&env));
        assert!(is_envelope("AAAA:AAAA:AAAA"));
        assert!(!is_envelope("123456789"));
        assert!(!is_envelope("AAAA::AAAA"));
        assert!(!is_envelope("AAAA:AAAA"));
        assert!(!is_envelope("AAAA:AAAA:AAAA:AAAA"));
        assert!(!is_envelope("AAAA:not base64:AAAA"));
    }

    #[test]
    fn blind_index_is_deterministic_per_key() {
        let a = codec(KEY_A);
        assert_eq!(
            a.blind_index("123456789").unwrap(),
            a.blind_index("123456789").unwrap()
        );
        assert_ne!(
            a.blind_index("123456789").unwrap(),
            a.blind_index("123456780").unwrap()
        );
        assert_ne!(
            a.blind_index("123456789").unwrap(),
            codec(KEY_B).blind_index("123456789").unwrap()
        );
        assert_eq!(a.blind_index("12345"), Err(SsnError::InvalidFormat));
    }

    #[test]
    fn key_is_read_on_every_call() {
        let mut source = MockKeySource::new();
        source
            .expect_key_hex()
            .times(2)
            .returning(|| Some(KEY_A.to_owned()));
        let c = SsnCodec::new(Arc::new(source));
        let env = c.encrypt("123456789").unwrap();
        assert_eq!(c.decrypt(&env).unwrap(), "123456789");
    }

    #[test]
    fn format_checked_before_key_lookup() {
        let mut source = MockKeySource::new();
        source.expect_key_hex().never();
        let c = SsnCodec::new(Arc::new(source));
        assert_eq!(c.encrypt("nope"), Err(SsnError::InvalidFormat));
    }

    #[test]
    fn rotation_takes_effect_on_next_call() {
        let store = KeyStore::with_key(KEY_A).unwrap();
        let c = SsnCodec::new(Arc::new(store.clone()));
        let env = c.encrypt("123456789").unwrap();
        store.rotate(KEY_B).unwrap();
        assert_eq!(c.decrypt(&env), Err(SsnError::DecryptionFailed));
        store.rotate(KEY_A).unwrap();
        assert_eq!(c.decrypt(&env).unwrap(), "123456789");
    }

    #[test]
    fn env_codec_picks_up_key_changes() {
        let var = "FIELDSAFE_TEST_CODEC_KEY";
        std::env::remove_var(var);
        let c = SsnCodec::from_env(var);
        assert_eq!(c.encrypt("123456789"), Err(SsnError::MissingKey));

        std::env::set_var(var, KEY_A);
        let env = c.encrypt("123456789").unwrap();
        assert_eq!(c.decrypt(&env).unwrap(), "123456789");

        std::env::set_var(var, "00ff");
        assert_eq!(c.decrypt(&env), Err(SsnError::InvalidKeyLength));
        std::env::remove_var(var);
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SsnCodec>();

        let c = codec(KEY_A);
        std::thread::scope(|s| {
            for i in 0..8 {
                let c = &c;
                s.spawn(move || {
                    let ssn = format!("12345678{i}");
                    let env = c.encrypt(&ssn).unwrap();
                    assert_eq!(c.decrypt(&env).unwrap(), ssn);
                    assert_eq!(c.mask(&env), format!("XXX-XX-678{i}"));
                });
            }
        });
    }

    #[test]
    fn error_codes() {
        assert_eq!(SsnError::DecryptionFailed.code(), "decryption_failed");
        assert_eq!(SsnError::from(KeyError::Missing), SsnError::MissingKey);
        assert_eq!(
            SsnError::from(KeyError::InvalidLength),
            SsnError::InvalidKeyLength
        );
    }
}
