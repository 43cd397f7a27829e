//! # File Committer
//!
//! Creates or updates each file of a batch through the contents API, strictly
//! in order. A failing file is recorded as a failed outcome and the batch moves
//! on; only caller misuse (malformed descriptors) or a credential failure stops
//! a batch outright.

use std::collections::BTreeMap;

use scribe_core::{Credentials, FileDescriptor, RepoSlug, RequestError, Settings};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::auth::CredentialProvider;
use crate::client::{ClientOptions, GitHubClient};
use crate::error::{ApiError, AuthError, ErrorKind};
use crate::models::PutFileRequest;

/// Result of processing one descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
  pub path: String,
  pub repository: String,
  pub branch: String,
  pub success: bool,
  /// Blob SHA of the written file
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_sha: Option<String>,
  /// Web link to the file at the new commit
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  /// Whether the write created the file rather than replacing it
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_kind: Option<ErrorKind>,
}

impl FileOutcome {
  fn committed(descriptor: &FileDescriptor, committed: CommittedFile) -> Self {
    Self {
      path: descriptor.path.clone(),
      repository: descriptor.repository.clone(),
      branch: descriptor.branch.clone(),
      success: true,
      sha: Some(committed.sha),
      commit_sha: Some(committed.commit_sha),
      url: committed.url,
      created: Some(committed.created),
      error: None,
      error_kind: None,
    }
  }

  fn failed(descriptor: &FileDescriptor, err: &ApiError) -> Self {
    Self {
      path: descriptor.display_path().to_string(),
      repository: descriptor.repository.clone(),
      branch: descriptor.branch.clone(),
      success: false,
      sha: None,
      commit_sha: None,
      url: None,
      created: None,
      error: Some(err.to_string()),
      error_kind: Some(err.kind()),
    }
  }
}

/// Aggregate result of one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitBatchResult {
  /// True iff every outcome succeeded
  pub overall_success: bool,
  pub processed_count: usize,
  pub outcomes: Vec<FileOutcome>,
  /// One `Failed to process file <path>: <message>` line per failed outcome
  pub errors: Vec<String>,
}

impl Default for CommitBatchResult {
  fn default() -> Self {
    Self {
      overall_success: true,
      processed_count: 0,
      outcomes: Vec::new(),
      errors: Vec::new(),
    }
  }
}

impl CommitBatchResult {
  fn record(mut self, outcome: FileOutcome) -> Self {
    if let Some(message) = &outcome.error {
      self.errors.push(format!("Failed to process file {}: {}", outcome.path, message));
    }
    self.overall_success &= outcome.success;
    self.outcomes.push(outcome);
    self.processed_count = self.outcomes.len();
    self
  }

  pub fn failed_count(&self) -> usize {
    self.outcomes.iter().filter(|outcome| !outcome.success).count()
  }

  /// Failed outcomes grouped by cause
  pub fn error_kinds(&self) -> BTreeMap<ErrorKind, usize> {
    let mut kinds = BTreeMap::new();
    for kind in self.outcomes.iter().filter_map(|outcome| outcome.error_kind) {
      *kinds.entry(kind).or_insert(0) += 1;
    }
    kinds
  }
}

/// A successful create-or-update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedFile {
  pub sha: String,
  pub commit_sha: String,
  pub url: Option<String>,
  pub created: bool,
}

/// Validate every descriptor up front, returning their parsed repositories in
/// order.
pub fn validate_descriptors(descriptors: &[FileDescriptor]) -> Result<Vec<RepoSlug>, RequestError> {
  descriptors
    .iter()
    .enumerate()
    .map(|(index, descriptor)| descriptor.validate(index + 1))
    .collect()
}

/// Commits files with one authenticated client
pub struct FileCommitter {
  client: GitHubClient,
}

impl FileCommitter {
  pub fn new(client: GitHubClient) -> Self {
    Self { client }
  }

  /// Commit every descriptor in order. Remote failures become failed
  /// outcomes; only malformed descriptors are returned as an error, before
  /// any remote call.
  pub async fn commit_files(&self, descriptors: &[FileDescriptor]) -> Result<CommitBatchResult, RequestError> {
    let repos = validate_descriptors(descriptors)?;
    Ok(self.commit_validated(descriptors, &repos).await)
  }

  /// `repos` holds the parsed repository of each descriptor, as returned by
  /// [`validate_descriptors`]
  async fn commit_validated(&self, descriptors: &[FileDescriptor], repos: &[RepoSlug]) -> CommitBatchResult {
    info!("Processing {} files", descriptors.len());

    let mut result = CommitBatchResult::default();
    for (descriptor, repo) in descriptors.iter().zip(repos) {
      let outcome = match self.commit_file(repo, descriptor).await {
        Ok(committed) => {
          info!("Successfully processed file: {}", descriptor.path);
          FileOutcome::committed(descriptor, committed)
        }
        Err(err) => {
          error!(kind = %err.kind(), "Failed to process file {}: {}", descriptor.display_path(), err);
          FileOutcome::failed(descriptor, &err)
        }
      };
      result = result.record(outcome);
    }

    if result.overall_success {
      info!("All files processed successfully");
    } else {
      warn!("Batch completed with {} errors", result.errors.len());
    }
    result
  }

  /// Look up the file, then create or update it.
  ///
  /// No retry on a stale SHA: a write rejected because the file changed
  /// between lookup and write fails with [`ErrorKind::Conflict`].
  #[instrument(skip(self, repo, descriptor), fields(repo = %repo, path = %descriptor.path), level = "debug")]
  pub async fn commit_file(&self, repo: &RepoSlug, descriptor: &FileDescriptor) -> Result<CommittedFile, ApiError> {
    let path = descriptor.path.as_str();
    let branch = descriptor.branch.as_str();

    let current_sha = match self.client.get_file_metadata(repo, path, branch).await? {
      Some(existing) => {
        info!("File {} exists, will update with SHA: {}", path, existing.sha);
        Some(existing.sha)
      }
      None => {
        info!("File {} does not exist, will create new file", path);
        None
      }
    };
    let created = current_sha.is_none();

    let request = PutFileRequest::new(&descriptor.commit_message, &descriptor.content, branch, current_sha);
    info!("Committing file {} to {}/{}", path, repo, branch);
    let response = self.client.put_file(repo, path, &request).await?;

    info!("Successfully committed {} with SHA: {}", path, response.content.sha);
    Ok(CommittedFile {
      sha: response.content.sha,
      commit_sha: response.commit.sha,
      url: response.content.html_url,
      created,
    })
  }
}

/// Everything a batch needs besides credentials and files
#[derive(Debug, Clone)]
pub struct BatchOptions {
  pub base_url: String,
  pub client: ClientOptions,
}

impl Default for BatchOptions {
  fn default() -> Self {
    Self::from_settings(&Settings::default())
  }
}

impl BatchOptions {
  pub fn from_settings(settings: &Settings) -> Self {
    Self {
      base_url: settings.api_base_url().to_string(),
      client: ClientOptions::from_settings(settings),
    }
  }
}

/// A failure that stops the whole batch before any file is attempted
#[derive(Debug, Error)]
pub enum BatchError {
  #[error(transparent)]
  InvalidInput(#[from] RequestError),
  #[error(transparent)]
  Auth(#[from] AuthError),
  #[error("Failed to create GitHub client: {0}")]
  Client(#[source] ApiError),
}

/// Resolve credentials once, then commit every descriptor with that header.
pub async fn commit_batch(
  credentials: Credentials,
  descriptors: &[FileDescriptor],
  options: &BatchOptions,
) -> Result<CommitBatchResult, BatchError> {
  if descriptors.is_empty() {
    return Err(RequestError::NoFiles.into());
  }
  let repos = validate_descriptors(descriptors)?;

  info!(credentials = credentials.kind(), "Resolving GitHub credentials");
  let mut provider = CredentialProvider::new(credentials, &options.base_url, &options.client);
  let auth = provider.resolve_auth_header().await?;

  let client = GitHubClient::from_auth(&auth, &options.base_url, &options.client).map_err(BatchError::Client)?;
  Ok(FileCommitter::new(client).commit_validated(descriptors, &repos).await)
}
