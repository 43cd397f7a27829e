//! # Output Formatting
//!
//! Colored status lines for the human-readable batch summary.

use owo_colors::{OwoColorize, Stream};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  #[default]
  Auto,
  /// Always emit colors
  Always,
  /// Disable colored output
  Never,
}

impl ColorMode {
  /// Apply the mode process-wide
  pub fn apply(self) {
    match self {
      ColorMode::Auto => owo_colors::unset_override(),
      ColorMode::Always => owo_colors::set_override(true),
      ColorMode::Never => owo_colors::set_override(false),
    }
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  println!("{} {}", "✓".if_supports_color(Stream::Stdout, |s| s.green()), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!("{} {}", "✗".if_supports_color(Stream::Stderr, |s| s.red()), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  println!("{} {}", "⚠".if_supports_color(Stream::Stdout, |s| s.yellow()), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  println!("{} {}", "ℹ".if_supports_color(Stream::Stdout, |s| s.blue()), message);
}

/// Format a repository file reference as `owner/name:path@branch`
pub fn format_repo_path(repository: &str, path: &str, branch: &str) -> String {
  let target = format!("{repository}:{path}@{branch}");
  target.if_supports_color(Stream::Stdout, |s| s.bright_green()).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_repo_path_without_color() {
    ColorMode::Never.apply();
    assert_eq!(format_repo_path("o/r", "a/b.txt", "main"), "o/r:a/b.txt@main");
  }
}
