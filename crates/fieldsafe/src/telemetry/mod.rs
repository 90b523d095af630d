//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No PII or key material** in any log field: no SSNs, envelopes,
//!   passwords or keys. Keys are referred to by fingerprint.
//! - Log level is configurable via `LOG_LEVEL` (default: `warn`).

pub mod init;

pub use init::init_telemetry;
