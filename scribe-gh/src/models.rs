use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of an existing file, as returned by the contents endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ContentMetadata {
  /// Blob SHA, required as the optimistic-concurrency token on update
  pub sha: String,
  pub path: String,
  #[serde(rename = "type", default = "default_content_type")]
  pub content_type: String,
  #[serde(default)]
  pub size: Option<u64>,
  #[serde(default)]
  pub html_url: Option<String>,
}

fn default_content_type() -> String {
  "file".to_string()
}

/// Body of a create-or-update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutFileRequest {
  pub message: String,
  /// Base64 of the UTF-8 file content
  pub content: String,
  pub branch: String,
  /// Present only when replacing an existing file
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha: Option<String>,
}

impl PutFileRequest {
  pub fn new(message: &str, content: &str, branch: &str, sha: Option<String>) -> Self {
    Self {
      message: message.to_string(),
      content: STANDARD.encode(content.as_bytes()),
      branch: branch.to_string(),
      sha,
    }
  }
}

/// Response of a successful create-or-update
#[derive(Debug, Clone, Deserialize)]
pub struct PutFileResponse {
  pub content: WrittenContent,
  pub commit: CommitRef,
}

/// The blob written by a create-or-update
#[derive(Debug, Clone, Deserialize)]
pub struct WrittenContent {
  pub sha: String,
  pub path: String,
  #[serde(default)]
  pub html_url: Option<String>,
}

/// The commit created by a create-or-update
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
  pub sha: String,
  #[serde(default)]
  pub html_url: Option<String>,
}

/// Installation access token returned by the token exchange
#[derive(Clone, Deserialize)]
pub struct InstallationToken {
  pub token: String,
  pub expires_at: DateTime<Utc>,
  #[serde(default)]
  pub permissions: Option<serde_json::Value>,
  #[serde(default)]
  pub repository_selection: Option<String>,
}

impl fmt::Debug for InstallationToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("InstallationToken")
      .field("token", &"<redacted>")
      .field("expires_at", &self.expires_at)
      .field("repository_selection", &self.repository_selection)
      .finish()
  }
}
