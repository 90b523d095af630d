//! Configuration loading and validation for the `fieldsafe` binary.
//!
//! Values are read from environment variables at startup. The key itself is
//! not part of the configuration: only the name of the variable that holds it.
//! The codec reads that variable on every call so rotation needs no restart.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::keys::DEFAULT_KEY_VAR;

/// Validated `fieldsafe` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Name of the environment variable holding the 64-hex-character key.
    #[serde(default = "default_encryption_key_var")]
    pub encryption_key_var: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_encryption_key_var() -> String {
    DEFAULT_KEY_VAR.into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encryption_key_var: default_encryption_key_var(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.encryption_key_var, "ENCRYPTION_KEY_VAR")?;
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;

        if self.encryption_key_var.contains('=') || self.encryption_key_var.contains('\0') {
            anyhow::bail!("ENCRYPTION_KEY_VAR must be a valid environment variable name");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_encryption_key_var(), "ENCRYPTION_KEY");
        assert_eq!(default_log_level(), "warn");
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_key_var() {
        let cfg = Config {
            encryption_key_var: "  ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_key_var() {
        let cfg = Config {
            encryption_key_var: "KEY=VALUE".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let cfg = Config {
            log_level: "".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}
