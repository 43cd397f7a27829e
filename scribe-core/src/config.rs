//! # Configuration Management
//!
//! User settings for scribe (API endpoint, request timeout, User-Agent) and the
//! XDG directories they live in. Settings come from `settings.toml`, then
//! environment overrides, then command line flags.

use std::env;
use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::consts::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_TIMEOUT_SECS};

/// Represents the configuration directories for the scribe application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "scribe").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the path to the settings file
  pub fn settings_path(&self) -> PathBuf {
    self.config_dir.join("settings.toml")
  }

  /// Load settings from the settings file, falling back to defaults
  pub fn load_settings(&self) -> Result<Settings> {
    Settings::load_from(&self.settings_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Runtime settings shared by every remote call in a batch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Base URL of the GitHub REST API
  pub api_base_url: String,
  /// Upper bound for each remote call, in seconds. Never zero.
  pub timeout_secs: u64,
  /// Overrides the default User-Agent header
  pub user_agent: Option<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_base_url: DEFAULT_API_BASE_URL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      user_agent: None,
    }
  }
}

impl Settings {
  /// Load settings from a TOML file. A missing file yields the defaults.
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let mut settings: Settings =
      toml::from_str(&content).with_context(|| format!("Failed to parse settings from {}", path.display()))?;
    settings.set_timeout_secs(settings.timeout_secs, &format!("timeout_secs in {}", path.display()))?;

    Ok(settings)
  }

  /// Apply `SCRIBE_API_URL` and `SCRIBE_TIMEOUT_SECS` from the process
  /// environment.
  pub fn apply_env(self) -> Result<Self> {
    self.apply_overrides(|key| env::var(key).ok())
  }

  fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
      self.api_base_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
      let secs = raw
        .trim()
        .parse()
        .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))?;
      self.set_timeout_secs(secs, ENV_TIMEOUT_SECS)?;
    }

    Ok(self)
  }

  /// Set the per-request timeout. `source` names where the value came from
  /// in the error for a zero timeout, which would fail every request.
  pub fn set_timeout_secs(&mut self, secs: u64, source: &str) -> Result<()> {
    let secs = NonZeroU64::new(secs).with_context(|| format!("{source} must be at least 1 second, got 0"))?;
    self.timeout_secs = secs.get();
    Ok(())
  }

  /// Per-request timeout
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// API base URL without a trailing slash
  pub fn api_base_url(&self) -> &str {
    self.api_base_url.trim_end_matches('/')
  }
}
