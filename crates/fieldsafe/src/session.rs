//! Session expiry checks used when building the request context.
//!
//! The expiry instant itself is still valid: a session whose `expires_at`
//! equals `now` is accepted.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Errors parsing a stored expiry timestamp.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session expiry timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
}

/// Returns `true` while `now` has not passed `expires_at`.
pub fn is_session_valid(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now <= expires_at
}

/// [`is_session_valid`] against the system clock.
pub fn is_session_valid_now(expires_at: DateTime<Utc>) -> bool {
    is_session_valid(expires_at, Utc::now())
}

/// Remaining lifetime, or `None` once expired. Zero at the expiry instant.
pub fn time_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    is_session_valid(expires_at, now).then(|| expires_at - now)
}

/// Parse an RFC 3339 timestamp into UTC.
///
/// # Errors
///
/// Returns [`SessionError::InvalidTimestamp`] if `text` is not RFC 3339.
pub fn parse_expires_at(text: &str) -> Result<DateTime<Utc>, SessionError> {
    Ok(DateTime::parse_from_rfc3339(text.trim())?.with_timezone(&Utc))
}
