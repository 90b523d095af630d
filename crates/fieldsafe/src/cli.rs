//! Command-line interface for operators and scripts.
//!
//! Every command prints one JSON document on stdout (except `keygen`, which
//! prints the bare key) and reports success through the exit code.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::ErrorResponse;
use fieldsafe::session;
use fieldsafe::ssn::{SsnCodec, SsnError};
use fieldsafe::validate;
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "fieldsafe",
    version,
    about = "Validate form fields and encrypt, decrypt, or mask SSNs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate and normalise a monetary amount
    Amount {
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
    /// Validate a phone number and print its E.164 form
    Phone {
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
    /// Check a password against the default policy (reads stdin when omitted)
    Password { input: Option<String> },
    /// Validate a two-letter US state code
    State { input: String },
    /// SSN envelope operations (key read from the configured variable)
    #[command(subcommand)]
    Ssn(SsnCommand),
    /// Check whether a session with the given expiry is still valid
    Session {
        /// RFC 3339 expiry timestamp
        expires_at: String,
        /// Evaluate at this RFC 3339 instant instead of the system clock
        #[arg(long)]
        now: Option<String>,
    },
    /// Generate a fresh 64-hex-character encryption key
    Keygen,
}

#[derive(Subcommand)]
pub enum SsnCommand {
    /// Encrypt a nine-digit SSN into an iv:ciphertext:tag envelope
    Encrypt { ssn: String },
    /// Decrypt an envelope back to the SSN
    Decrypt { envelope: String },
    /// Print the display mask for a plaintext SSN or an envelope
    Mask { value: String },
    /// Report whether a value is syntactically an envelope
    IsEnvelope { value: String },
    /// Print the deterministic blind index of an SSN
    Index { ssn: String },
}

/// Execute `cmd`, printing its output on stdout. Returns `true` on success.
///
/// # Errors
///
/// Returns an error only for I/O problems; validation, codec, and timestamp
/// failures are reported on stdout with `false`.
pub fn run(cmd: Command, codec: &SsnCodec) -> Result<bool> {
    let stdout = std::io::stdout();
    run_to(cmd, codec, &mut stdout.lock())
}

/// Execute `cmd`, writing its output to `out`.
pub fn run_to<W: Write>(cmd: Command, codec: &SsnCodec, out: &mut W) -> Result<bool> {
    match cmd {
        Command::Amount { input } => {
            let result = validate::validate_amount_str(&input);
            emit(out, &result)?;
            Ok(result.is_valid)
        }
        Command::Phone { input } => {
            let result = validate::validate_phone(&input);
            emit(out, &result)?;
            Ok(result.is_valid)
        }
        Command::Password { input } => {
            let password = match input {
                Some(p) => p,
                None => read_stdin_line()?,
            };
            let result = validate::validate_password(&password);
            emit(out, &result)?;
            Ok(result.is_valid)
        }
        Command::State { input } => {
            let result = validate::validate_state_code(&input);
            emit(out, &result)?;
            Ok(result.is_valid)
        }
        Command::Ssn(op) => run_ssn(op, codec, out),
        Command::Session { expires_at, now } => run_session(&expires_at, now.as_deref(), out),
        Command::Keygen => {
            writeln!(out, "{}", fieldsafe::keys::generate_key_hex())
                .context("failed to write key")?;
            info!("generated new encryption key");
            Ok(true)
        }
    }
}

fn run_ssn<W: Write>(op: SsnCommand, codec: &SsnCodec, out: &mut W) -> Result<bool> {
    let outcome = match op {
        SsnCommand::Encrypt { ssn } => codec.encrypt(&ssn).map(|e| json!({ "envelope": e })),
        SsnCommand::Decrypt { envelope } => codec.decrypt(&envelope).map(|s| json!({ "ssn": s })),
        SsnCommand::Index { ssn } => codec.blind_index(&ssn).map(|i| json!({ "index": i })),
        SsnCommand::Mask { value } => Ok(json!({ "masked": codec.mask(&value) })),
        SsnCommand::IsEnvelope { value } => {
            let is_envelope = codec.is_envelope(&value);
            emit(out, &json!({ "isEnvelope": is_envelope }))?;
            return Ok(is_envelope);
        }
    };
    match outcome {
        Ok(body) => {
            emit(out, &body)?;
            Ok(true)
        }
        Err(e) => {
            emit(out, &ssn_error_body(e))?;
            Ok(false)
        }
    }
}

fn run_session<W: Write>(expires_at: &str, now: Option<&str>, out: &mut W) -> Result<bool> {
    let parsed = session::parse_expires_at(expires_at).and_then(|expires_at| {
        let now = match now {
            Some(n) => session::parse_expires_at(n)?,
            None => chrono::Utc::now(),
        };
        Ok((expires_at, now))
    });
    let (expires_at, now) = match parsed {
        Ok(pair) => pair,
        Err(e) => {
            emit(out, &ErrorResponse::new("invalid_timestamp", e.to_string()))?;
            return Ok(false);
        }
    };

    let remaining = session::time_remaining(expires_at, now);
    let valid = remaining.is_some();
    emit(
        out,
        &json!({
            "valid": valid,
            "remainingSeconds": remaining.map(|d| d.num_seconds()),
        }),
    )?;
    Ok(valid)
}

fn ssn_error_body(e: SsnError) -> ErrorResponse {
    ErrorResponse::new(e.code(), e.to_string())
}

fn emit<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    writeln!(out, "{rendered}").context("failed to write output")?;
    Ok(())
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
