//! Environment variable isolation for testing
//!
//! Redirects the XDG config home into a per-test temporary
//! directory and clears scribe's own override variables, restoring every
//! touched variable on drop. Guards in one process are taken one at a time.

use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

/// Variables cleared for the lifetime of the guard so a developer's shell
/// cannot leak settings into tests
const SCRIBE_VARS: [&str; 3] = ["SCRIBE_API_URL", "SCRIBE_TIMEOUT_SECS", "SCRIBE_VERBOSITY"];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Overrides XDG directories and scribe environment variables until dropped
pub struct EnvTestGuard {
  /// The temporary directory that backs the XDG directories
  pub temp_dir: TempDir,
  /// Original values of every variable the guard touched
  saved: Vec<(String, Option<String>)>,
  /// Held until the variables above are restored
  _lock: MutexGuard<'static, ()>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";

  /// Create a new test environment with overridden XDG directories
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    // A panicking test poisons the lock but still restores the environment
    let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut guard = Self {
      temp_dir,
      saved: Vec::new(),
      _lock: lock,
    };

    let config_dir = guard.config_dir();
    std::fs::create_dir_all(&config_dir).expect("Failed to create config directory");

    guard.set(Self::XDG_CONFIG_HOME, Some(config_dir.to_string_lossy().as_ref()));
    for var in SCRIBE_VARS {
      guard.set(var, None);
    }

    guard
  }

  /// Set (or with `None`, remove) a variable, remembering its original value
  pub fn set(&mut self, key: &str, value: Option<&str>) {
    if !self.saved.iter().any(|(saved, _)| saved == key) {
      self.saved.push((key.to_string(), env::var(key).ok()));
    }

    // SAFETY: test-only helper; `ENV_LOCK` serializes environment access.
    unsafe {
      match value {
        Some(value) => env::set_var(key, value),
        None => env::remove_var(key),
      }
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    for (key, original) in self.saved.drain(..).rev() {
      // SAFETY: see `set`.
      unsafe {
        match original {
          Some(value) => env::set_var(&key, value),
          None => env::remove_var(&key),
        }
      }
    }
  }
}
