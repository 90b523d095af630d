//! Keyed blind index over sensitive identifiers.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation label for the index subkey.
const INDEX_CONTEXT: &[u8] = b"fieldsafe/ssn-blind-index/v1";

/// Lowercase-hex `HMAC-SHA256(subkey, value)` where
/// `subkey = HMAC-SHA256(key, INDEX_CONTEXT)`.
///
/// The subkey keeps index tags independent from the encryption key.
pub fn keyed_index(key: &[u8], value: &[u8]) -> String {
    let mut subkey = hmac_sha256(key, INDEX_CONTEXT);
    let tag = hmac_sha256(&subkey, value);
    subkey.iter_mut().for_each(|b| *b = 0);
    hex::encode(tag)
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}
