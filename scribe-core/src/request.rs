//! # Commit Requests
//!
//! The inbound document handed to scribe by its caller: one credential shape
//! plus an ordered list of files to create or update. Secret indirection is
//! resolved by the caller before this point; every value here is literal.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_BRANCH;
use crate::credentials::{AppCredential, Credentials, TokenCredential};
use crate::repo::{InvalidRepository, RepoSlug};

/// Errors raised while reading or validating a commit request
#[derive(Debug, Error)]
pub enum RequestError {
  #[error("GitHub token or GitHub App credentials are required")]
  MissingCredentials,
  #[error("Specify either githubToken or githubApp, not both")]
  AmbiguousCredentials,
  #[error("githubApp.{0} is required")]
  MissingAppField(&'static str),
  #[error("At least one file must be specified")]
  NoFiles,
  #[error("Missing required field '{field}' for file #{index} ({path})")]
  MissingField {
    index: usize,
    path: String,
    field: &'static str,
  },
  #[error("File #{index} ({path}): {source}")]
  InvalidRepository {
    index: usize,
    path: String,
    #[source]
    source: InvalidRepository,
  },
  #[error("Failed to read request from {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to parse JSON request: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Failed to parse TOML request: {0}")]
  Toml(#[from] toml::de::Error),
}

/// GitHub App fields as they appear in the request document
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubAppInput {
  #[serde(default, alias = "appID")]
  pub app_id: String,
  #[serde(default, alias = "installationID")]
  pub installation_id: String,
  #[serde(default)]
  pub private_key: String,
}

impl fmt::Debug for GitHubAppInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GitHubAppInput")
      .field("app_id", &self.app_id)
      .field("installation_id", &self.installation_id)
      .field("private_key", &"<redacted>")
      .finish()
  }
}

/// One file to create or update. Produces at most one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
  #[serde(default)]
  pub repository: String,
  #[serde(default = "default_branch")]
  pub branch: String,
  #[serde(default)]
  pub path: String,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub commit_message: String,
}

fn default_branch() -> String {
  DEFAULT_BRANCH.to_string()
}

impl FileDescriptor {
  /// Create a descriptor targeting the default branch
  pub fn new(
    repository: impl Into<String>,
    path: impl Into<String>,
    content: impl Into<String>,
    commit_message: impl Into<String>,
  ) -> Self {
    Self {
      repository: repository.into(),
      branch: default_branch(),
      path: path.into(),
      content: content.into(),
      commit_message: commit_message.into(),
    }
  }

  /// Target a different branch
  pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
    self.branch = branch.into();
    self
  }

  /// Check that every required field is present. `index` is the 1-based
  /// position in the batch and is only used for error reporting.
  pub fn validate(&self, index: usize) -> Result<RepoSlug, RequestError> {
    let missing = |field: &'static str| RequestError::MissingField {
      index,
      path: self.display_path().to_string(),
      field,
    };

    if self.repository.trim().is_empty() {
      return Err(missing("repository"));
    }
    if self.path.trim().is_empty() {
      return Err(missing("path"));
    }
    if self.branch.trim().is_empty() {
      return Err(missing("branch"));
    }
    // Whitespace-only content is a legitimate file body; an absent one is not.
    if self.content.is_empty() {
      return Err(missing("content"));
    }
    if self.commit_message.trim().is_empty() {
      return Err(missing("commitMessage"));
    }

    RepoSlug::parse(&self.repository).map_err(|source| RequestError::InvalidRepository {
      index,
      path: self.path.clone(),
      source,
    })
  }

  /// Path used in messages, falling back to `unknown` when blank
  pub fn display_path(&self) -> &str {
    if self.path.trim().is_empty() { "unknown" } else { &self.path }
  }
}

/// The full inbound document
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub github_token: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub github_app: Option<GitHubAppInput>,
  #[serde(default)]
  pub files: Vec<FileDescriptor>,
}

impl fmt::Debug for CommitRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CommitRequest")
      .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
      .field("github_app", &self.github_app)
      .field("files", &self.files)
      .finish()
  }
}

impl CommitRequest {
  pub fn from_json(input: &str) -> Result<Self, RequestError> {
    Ok(serde_json::from_str(input)?)
  }

  pub fn from_toml(input: &str) -> Result<Self, RequestError> {
    Ok(toml::from_str(input)?)
  }

  /// Load a request file. `.toml` files are parsed as TOML, everything else
  /// as JSON.
  pub fn from_path(path: &Path) -> Result<Self, RequestError> {
    let content = fs::read_to_string(path).map_err(|source| RequestError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some("toml") => Self::from_toml(&content),
      _ => Self::from_json(&content),
    }
  }

  /// Select the credential variant. Exactly one must be supplied.
  pub fn credentials(&self) -> Result<Credentials, RequestError> {
    match (&self.github_token, &self.github_app) {
      (Some(_), Some(_)) => Err(RequestError::AmbiguousCredentials),
      (None, None) => Err(RequestError::MissingCredentials),
      (Some(token), None) => Ok(Credentials::Token(TokenCredential::new(token.clone()))),
      (None, Some(app)) => {
        if app.app_id.trim().is_empty() {
          return Err(RequestError::MissingAppField("appId"));
        }
        if app.installation_id.trim().is_empty() {
          return Err(RequestError::MissingAppField("installationId"));
        }
        if app.private_key.trim().is_empty() {
          return Err(RequestError::MissingAppField("privateKey"));
        }
        Ok(Credentials::App(AppCredential::new(
          app.app_id.trim(),
          app.installation_id.trim(),
          app.private_key.clone(),
        )))
      }
    }
  }

  /// Split into credentials and the file list, rejecting an empty batch.
  pub fn into_parts(self) -> Result<(Credentials, Vec<FileDescriptor>), RequestError> {
    let credentials = self.credentials()?;
    if self.files.is_empty() {
      return Err(RequestError::NoFiles);
    }
    Ok((credentials, self.files))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TOKEN_REQUEST: &str = r#"{
    "githubToken": "ghp_test",
    "files": [
      {
        "repository": "octocat/hello-world",
        "path": "apps/demo.yaml",
        "content": "kind: Demo\n",
        "commitMessage": "Add demo"
      },
      {
        "repository": "octocat/hello-world",
        "branch": "develop",
        "path": "apps/other.yaml",
        "content": "kind: Other\n",
        "commitMessage": "Add other"
      }
    ]
  }"#;

  #[test]
  fn test_parse_token_request() {
    let request = CommitRequest::from_json(TOKEN_REQUEST).unwrap();
    let (credentials, files) = request.into_parts().unwrap();

    assert_eq!(credentials, Credentials::Token(TokenCredential::new("ghp_test")));
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].branch, "main");
    assert_eq!(files[1].branch, "develop");
    assert_eq!(files[0].commit_message, "Add demo");
  }

  #[test]
  fn test_parse_app_request() {
    let request = CommitRequest::from_json(
      r#"{
        "githubApp": { "appId": " 12345 ", "installationId": "67890", "privateKey": "pem" },
        "files": [{ "repository": "o/r", "path": "p", "content": "c", "commitMessage": "m" }]
      }"#,
    )
    .unwrap();

    match request.credentials().unwrap() {
      Credentials::App(app) => {
        assert_eq!(app.app_id, "12345");
        assert_eq!(app.installation_id, "67890");
        assert_eq!(app.private_key, "pem");
      }
      other => panic!("expected app credentials, got {other:?}"),
    }
  }

  #[test]
  fn test_both_credentials_rejected() {
    let request = CommitRequest {
      github_token: Some("t".to_string()),
      github_app: Some(GitHubAppInput::default()),
      files: vec![],
    };
    assert!(matches!(request.credentials(), Err(RequestError::AmbiguousCredentials)));
  }

  #[test]
  fn test_no_credentials_rejected() {
    let request = CommitRequest::default();
    assert!(matches!(request.credentials(), Err(RequestError::MissingCredentials)));
  }

  #[test]
  fn test_blank_app_field_rejected() {
    let request = CommitRequest {
      github_app: Some(GitHubAppInput {
        app_id: "1".to_string(),
        installation_id: "".to_string(),
        private_key: "pem".to_string(),
      }),
      ..Default::default()
    };
    assert!(matches!(
      request.credentials(),
      Err(RequestError::MissingAppField("installationId"))
    ));
  }

  #[test]
  fn test_empty_file_list_rejected() {
    let request = CommitRequest {
      github_token: Some("t".to_string()),
      ..Default::default()
    };
    let err = request.into_parts().unwrap_err();
    assert_eq!(err.to_string(), "At least one file must be specified");
  }

  #[test]
  fn test_validate_reports_missing_field() {
    let descriptor = FileDescriptor::new("o/r", "config.yaml", "data", "  ");
    let err = descriptor.validate(3).unwrap_err();

    assert!(matches!(err, RequestError::MissingField { index: 3, field: "commitMessage", .. }));
    assert!(err.to_string().contains("config.yaml"));
  }

  #[test]
  fn test_validate_missing_path_uses_unknown() {
    let descriptor = FileDescriptor::new("o/r", "", "data", "msg");
    let err = descriptor.validate(0).unwrap_err();
    assert!(err.to_string().contains("(unknown)"));
  }

  #[test]
  fn test_validate_rejects_bad_repository() {
    let descriptor = FileDescriptor::new("not-a-repo", "a.txt", "data", "msg");
    assert!(matches!(
      descriptor.validate(0),
      Err(RequestError::InvalidRepository { index: 0, .. })
    ));
  }

  #[test]
  fn test_validate_returns_slug() {
    let slug = FileDescriptor::new("octocat/hello", "a.txt", " ", "msg")
      .with_branch("release")
      .validate(0)
      .unwrap();
    assert_eq!(slug.owner, "octocat");
    assert_eq!(slug.name, "hello");
  }

  #[test]
  fn test_parse_toml_request() {
    let request = CommitRequest::from_toml(
      r#"
githubToken = "ghp_toml"

[[files]]
repository = "o/r"
path = "README.md"
content = "hello"
commitMessage = "docs"
"#,
    )
    .unwrap();

    assert_eq!(request.github_token.as_deref(), Some("ghp_toml"));
    assert_eq!(request.files[0].branch, "main");
  }

  #[test]
  fn test_from_path_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("request.json");
    fs::write(&json_path, TOKEN_REQUEST).unwrap();

    let request = CommitRequest::from_path(&json_path).unwrap();
    assert_eq!(request.files.len(), 2);

    let missing = CommitRequest::from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, RequestError::Io { .. }));
  }

  #[test]
  fn test_request_debug_redacts_token() {
    let request = CommitRequest::from_json(TOKEN_REQUEST).unwrap();
    let rendered = format!("{request:?}");
    assert!(!rendered.contains("ghp_test"));
  }
}
