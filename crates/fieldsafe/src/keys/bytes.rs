//! [`KeyBytes`]: decoded symmetric key material.

use sha2::{Digest, Sha256};

use super::{KeyError, KEY_LEN};

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Decoded fresh from the key source on each codec call and dropped as soon as
/// the operation completes. The memory is overwritten with zeroes on drop.
#[derive(Clone)]
pub struct KeyBytes(Box<[u8; KEY_LEN]>);

impl KeyBytes {
    /// Decode a 64-character hex key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] if `hex_key` is empty, and
    /// [`KeyError::InvalidLength`] if it is not valid hex or does not decode to
    /// exactly [`KEY_LEN`] bytes.
    pub fn from_hex(hex_key: &str) -> Result<Self, KeyError> {
        if hex_key.is_empty() {
            return Err(KeyError::Missing);
        }
        let mut decoded = hex::decode(hex_key).map_err(|_| KeyError::InvalidLength)?;
        if decoded.len() != KEY_LEN {
            decoded.iter_mut().for_each(|b| *b = 0);
            return Err(KeyError::InvalidLength);
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(&decoded);
        decoded.iter_mut().for_each(|b| *b = 0);
        Ok(Self(buf))
    }

    /// Decode an optional key value, treating `None` as missing.
    pub fn from_source(hex_key: Option<&str>) -> Result<Self, KeyError> {
        Self::from_hex(hex_key.ok_or(KeyError::Missing)?)
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }

    /// Short, non-reversible identifier for logs: hex of the first 8 bytes of SHA-256.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_bytes());
        hex::encode(&digest[..8])
    }
}

impl Drop for KeyBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("KeyBytes([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn decodes_valid_hex() {
        let key = KeyBytes::from_hex(KEY_A).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LEN);
        assert_eq!(key.as_bytes()[31], 0x1f);
    }

    #[test]
    fn accepts_uppercase_hex() {
        assert!(KeyBytes::from_hex(&KEY_A.to_uppercase()).is_ok());
    }

    #[test]
    fn empty_and_absent_are_missing() {
        assert_eq!(KeyBytes::from_hex("").unwrap_err(), KeyError::Missing);
        assert_eq!(KeyBytes::from_source(None).unwrap_err(), KeyError::Missing);
    }

    #[test]
    fn wrong_length_rejected() {
        assert_eq!(
            KeyBytes::from_hex(&KEY_A[..32]).unwrap_err(),
            KeyError::InvalidLength
        );
        assert_eq!(
            KeyBytes::from_hex(&format!("{KEY_A}00")).unwrap_err(),
            KeyError::InvalidLength
        );
    }

    #[test]
    fn non_hex_rejected_as_invalid_length() {
        let bad = "zz".repeat(KEY_LEN);
        assert_eq!(KeyBytes::from_hex(&bad).unwrap_err(), KeyError::InvalidLength);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = KeyBytes::from_hex(KEY_A).unwrap();
        let b = KeyBytes::from_hex(KEY_A).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
        assert!(!KEY_A.contains(&a.fingerprint()));
    }

    #[test]
    fn redacted_in_debug() {
        let key = KeyBytes::from_hex(KEY_A).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("1f"));
    }
}
