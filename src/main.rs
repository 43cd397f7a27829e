//! # Scribe CLI Entry Point
//!
//! Parses arguments, sets up tracing and runs one commit batch.

use std::process::ExitCode;

use clap::Parser;
use scribe::cli::{self, Cli};
use scribe_core::consts::ENV_VERBOSITY;
use scribe_core::print_error;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
  let cmd = Cli::parse();
  init_tracing(cmd.verbose);

  let report = cli::handle_cli(&cmd);
  if let Err(err) = cli::print_report(&report, cmd.format) {
    print_error(&format!("{err:#}"));
    return ExitCode::FAILURE;
  }

  ExitCode::from(report.severity.exit_code())
}

/// Logs go to stderr so stdout carries only the report
fn init_tracing(verbose: u8) {
  // Without -v, fall back to SCRIBE_VERBOSITY
  let verbose_count = if verbose > 0 {
    verbose
  } else {
    std::env::var(ENV_VERBOSITY)
      .ok()
      .and_then(|value| value.trim().parse().ok())
      .unwrap_or(0)
  };

  let level = match verbose_count {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);
}
