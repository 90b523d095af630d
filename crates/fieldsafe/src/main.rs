//! `fieldsafe` operator CLI entry point.
//!
//! Startup sequence:
//! 1. Parse command-line arguments.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Run the command and map its outcome to the exit code.

mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use fieldsafe::config::Config;
use fieldsafe::ssn::SsnCodec;

fn main() -> Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Arguments
    // -----------------------------------------------------------------------
    let args = cli::Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    fieldsafe::telemetry::init_telemetry(&cfg.log_level)?;
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        key_var = %cfg.encryption_key_var,
        "fieldsafe starting"
    );

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let codec = SsnCodec::from_env(cfg.encryption_key_var.clone());
    let succeeded = cli::run(args.cmd, &codec)?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
