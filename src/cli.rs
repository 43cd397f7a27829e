//! # Command Line Interface
//!
//! `scribe [OPTIONS] <REQUEST>` reads a commit request, commits every file it
//! names and prints a report. The exit status follows the report severity.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, ValueEnum};
use scribe_core::{ColorMode, CommitRequest, Settings, get_config_dirs};
use scribe_gh::{BatchOptions, CommitBatchResult, commit_batch};
use tracing::{debug, error, info};

use crate::report::Report;

/// How the report is written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
  /// One colored line per file plus a summary
  #[default]
  Text,
  /// The full report as pretty-printed JSON
  Json,
}

/// Top-level CLI command for scribe
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(about = "Create or update files in GitHub repositories from a declarative request")]
#[command(
  long_about = "Scribe reads a request naming GitHub credentials and a list of files, then\n\
        creates or updates each file through the GitHub contents API, one at a time.\n\n\
        A failing file does not stop the batch; every file gets its own outcome."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Request file (JSON, or TOML with a .toml extension); `-` reads JSON from stdin
  #[arg(value_name = "REQUEST")]
  pub request: PathBuf,

  /// GitHub API base URL, for GitHub Enterprise Server or testing
  #[arg(long, value_name = "URL")]
  pub api_url: Option<String>,

  /// Timeout for each GitHub API call, in seconds
  #[arg(long, value_name = "SECS")]
  pub timeout: Option<u64>,

  /// Output format of the report
  #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Text)]
  pub format: OutputFormat,

  /// Controls when colored output is used
  #[arg(long, alias = "colors", value_enum, ignore_case = true, default_value_t = ColorMode::Auto)]
  pub color: ColorMode,

  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,
}

/// Run the batch described by the CLI and build its report. Never fails:
/// anything that stops the batch becomes a fatal report.
pub fn handle_cli(cli: &Cli) -> Report {
  cli.color.apply();
  info!("Running GitHub file manager");

  match run_batch(cli) {
    Ok(result) => Report::from_batch(result),
    Err(err) => {
      let report = Report::fatal(describe(&err));
      error!("{}", report.reason);
      report
    }
  }
}

/// Write the report in the requested format
pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
  match format {
    OutputFormat::Json => {
      let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
      println!("{json}");
    }
    OutputFormat::Text => report.print_text(),
  }
  Ok(())
}

/// Settings file, then environment, then flags
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
  let mut settings = get_config_dirs()?.load_settings()?.apply_env()?;

  if let Some(url) = &cli.api_url {
    settings.api_base_url = url.clone();
  }
  if let Some(timeout) = cli.timeout {
    settings.set_timeout_secs(timeout, "--timeout")?;
  }

  debug!(api_base_url = %settings.api_base_url, timeout_secs = settings.timeout_secs, "Resolved settings");
  Ok(settings)
}

fn read_request(source: &Path) -> Result<CommitRequest> {
  if source.as_os_str() == "-" {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("Failed to read request from stdin")?;
    return Ok(CommitRequest::from_json(&input)?);
  }

  if !source.exists() {
    anyhow::bail!("Request file {} does not exist", source.display());
  }
  debug!(path = %source.display(), "Reading request");
  Ok(CommitRequest::from_path(source)?)
}

/// Join the error chain, skipping causes a message already includes
fn describe(err: &anyhow::Error) -> String {
  let mut message = err.to_string();
  for cause in err.chain().skip(1) {
    let cause = cause.to_string();
    if !message.contains(&cause) {
      message = format!("{message}: {cause}");
    }
  }
  message
}

fn run_batch(cli: &Cli) -> Result<CommitBatchResult> {
  let settings = resolve_settings(cli)?;
  let (credentials, files) = read_request(&cli.request)?.into_parts()?;
  let options = BatchOptions::from_settings(&settings);

  let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
  let result = runtime.block_on(commit_batch(credentials, &files, &options))?;
  Ok(result)
}
