//! AES-256-GCM-SIV encryption of short string fields into colon-separated envelopes.
//!
//! A fresh random 96-bit nonce is drawn for every encryption, so the same
//! plaintext never produces the same envelope twice.

use aes_gcm_siv::{
    aead::{generic_array::GenericArray, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::keys::KEY_LEN;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the detached authentication tag.
pub const TAG_LEN: usize = 16;

/// Separator between the three envelope segments.
pub const SEGMENT_SEPARATOR: char = ':';

/// A parsed encrypted value.
///
/// The string representation is `<base64(nonce)>:<base64(ciphertext)>:<base64(tag)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            STANDARD.encode(self.nonce),
            STANDARD.encode(&self.ciphertext),
            STANDARD.encode(self.tag),
            sep = SEGMENT_SEPARATOR,
        )
    }

    /// Parse an envelope string back into an [`Envelope`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::SegmentCount`] if the string does not split into
    /// exactly three segments, and [`CipherError::MalformedSegment`] if any segment is
    /// not base64 or the nonce/tag have the wrong length.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        let (iv, ct, tag) = split_segments(s).ok_or(CipherError::SegmentCount)?;

        let nonce = decode_fixed::<NONCE_LEN>(iv)?;
        let ciphertext = STANDARD
            .decode(ct)
            .map_err(|_| CipherError::MalformedSegment)?;
        let tag = decode_fixed::<TAG_LEN>(tag)?;

        Ok(Self {
            nonce,
            ciphertext,
            tag,
        })
    }
}

/// Split `s` into exactly three segments, or `None`.
pub fn split_segments(s: &str) -> Option<(&str, &str, &str)> {
    let mut parts = s.split(SEGMENT_SEPARATOR);
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second, third))
}

/// Returns `true` if `segment` is non-empty standard base64.
pub fn is_base64_segment(segment: &str) -> bool {
    !segment.is_empty() && STANDARD.decode(segment).is_ok()
}

fn decode_fixed<const N: usize>(segment: &str) -> Result<[u8; N], CipherError> {
    let bytes = STANDARD
        .decode(segment)
        .map_err(|_| CipherError::MalformedSegment)?;
    bytes.try_into().map_err(|_| CipherError::MalformedSegment)
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM-SIV encryption or decryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// The envelope does not have exactly three segments.
    #[error("envelope must have exactly three segments")]
    SegmentCount,

    /// A segment is not valid base64 or has the wrong decoded length.
    #[error("malformed envelope segment")]
    MalformedSegment,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (unreachable
/// with a valid key and nonce).
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Envelope, CipherError> {
    let cipher = build_cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(Envelope {
        nonce,
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Authenticate and decrypt an [`Envelope`] back to plaintext bytes.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] if authentication fails (wrong key or tampered data).
pub fn decrypt(envelope: &Envelope, key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    let mut buffer = envelope.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&envelope.nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(&envelope.tag),
        )
        .map_err(|_| CipherError::AeadFailure)?;
    Ok(buffer)
}

fn build_cipher(key: &[u8]) -> Result<Aes256GcmSiv, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256GcmSiv::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}
