//! # Repository Identifiers
//!
//! Parsing of the `owner/name` repository form used in file descriptors, with
//! GitHub clone URLs accepted as a convenience.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SLUG_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").expect("Failed to compile repository regex"));

static GITHUB_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:https?://|git@)github\.com[/:]([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$")
    .expect("Failed to compile GitHub URL regex")
});

/// Error returned when a repository string is not `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid repository '{0}': expected 'owner/name'")]
pub struct InvalidRepository(pub String);

/// A GitHub repository split into owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
  pub owner: String,
  pub name: String,
}

impl RepoSlug {
  /// Parse `owner/name`, `https://github.com/owner/name(.git)` or
  /// `git@github.com:owner/name.git`.
  pub fn parse(input: &str) -> Result<Self, InvalidRepository> {
    let trimmed = input.trim();
    let captures = SLUG_REGEX
      .captures(trimmed)
      .or_else(|| GITHUB_URL_REGEX.captures(trimmed))
      .ok_or_else(|| InvalidRepository(input.to_string()))?;

    let owner = captures[1].to_string();
    let name = captures[2].to_string();
    if owner == "." || owner == ".." || name == "." || name == ".." {
      return Err(InvalidRepository(input.to_string()));
    }

    Ok(Self { owner, name })
  }
}

impl FromStr for RepoSlug {
  type Err = InvalidRepository;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for RepoSlug {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}
