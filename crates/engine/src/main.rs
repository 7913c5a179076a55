//! `engine`: command-line entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging.
//! 3. Build the [`EngineContext`] from the configured master key.
//! 4. Run the command against stdin and write the result to stdout.

use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use engine::cli::{self, CliError, Command};
use engine::{Config, EngineContext, ErrorResponse};
use tracing::{error, info};

fn main() -> Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    engine::telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_label = cfg.bind_label,
        "engine starting"
    );

    let cmd = match Command::parse(std::env::args().skip(1)) {
        Ok(cmd) => cmd,
        Err(_) => {
            eprintln!("{}", cli::USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    // -----------------------------------------------------------------------
    // 3. Engine context
    // -----------------------------------------------------------------------
    let ctx = match EngineContext::from_config(&cfg) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(code = e.code(), "master key unusable");
            print_error(ErrorResponse::from(e))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    match cli::run(&cmd, &ctx, &input) {
        Ok(out) => {
            println!("{out}");
            Ok(ExitCode::SUCCESS)
        }
        Err(CliError::Engine(e)) => {
            print_error(ErrorResponse::from(e))?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            print_error(ErrorResponse::new("usage", e.to_string()))?;
            Ok(ExitCode::from(2))
        }
    }
}

fn print_error(body: ErrorResponse) -> Result<()> {
    let json = serde_json::to_string(&body).context("failed to serialise error response")?;
    println!("{json}");
    Ok(())
}
