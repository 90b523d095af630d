//! Form-field validation and SSN envelope encryption for the banking web app.
//!
//! - [`validate`]: amount, phone, password and state-code validators.
//! - [`ssn`]: encrypt, decrypt, mask and blind-index SSNs.
//! - [`session`]: session expiry boundary checks.
//! - [`keys`]: key sources consulted on every codec call.
//!
//! Everything here is synchronous and safe to call from any number of threads.

pub mod config;
pub mod crypto;
pub mod keys;
pub mod session;
pub mod ssn;
pub mod telemetry;
pub mod validate;

pub use keys::{EnvKeySource, KeySource, KeyStore, StaticKeySource};
pub use ssn::{SsnCodec, SsnError};
