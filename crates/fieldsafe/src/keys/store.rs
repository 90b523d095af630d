//! [`KeyStore`]: rotatable in-memory key slot.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::info;

use super::{KeyBytes, KeyError, KeySource};

/// Thread-safe slot holding the current hex-encoded key.
///
/// Backed by [`ArcSwapOption`] so that codec calls read the key without
/// locking, while an operator or rotation hook can atomically swap in a new
/// key. The swap is visible to the very next codec call.
#[derive(Clone, Default)]
pub struct KeyStore {
    inner: Arc<ArcSwapOption<String>>,
}

impl KeyStore {
    /// Create a new, empty [`KeyStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `key_hex`.
    ///
    /// # Errors
    ///
    /// See [`KeyStore::rotate`].
    pub fn with_key(key_hex: &str) -> Result<Self, KeyError> {
        let store = Self::new();
        store.rotate(key_hex)?;
        Ok(store)
    }

    /// Returns `true` if a key is currently held.
    pub fn is_ready(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Store (or replace) the current key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] for an empty value and
    /// [`KeyError::InvalidLength`] if it does not decode to 32 bytes. The
    /// previous key is retained on error.
    pub fn rotate(&self, key_hex: &str) -> Result<(), KeyError> {
        let decoded = KeyBytes::from_hex(key_hex)?;
        self.inner.store(Some(Arc::new(key_hex.to_owned())));
        info!(fingerprint = %decoded.fingerprint(), "encryption key rotated");
        Ok(())
    }

    /// Drop the current key. Subsequent codec calls fail with a missing-key error.
    pub fn clear(&self) {
        self.inner.store(None);
        info!("encryption key cleared");
    }
}

impl KeySource for KeyStore {
    fn key_hex(&self) -> Option<String> {
        self.inner.load_full().map(|k| k.as_ref().clone())
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("ready", &self.is_ready())
            .finish()
    }
}
