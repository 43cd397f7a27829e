//! # GitHub Contents Client
//!
//! Resolves credentials into an Authorization header and commits files
//! through the GitHub contents API, one at a time, collecting a per-file
//! outcome for every descriptor of a batch.

pub mod auth;
pub mod client;
pub mod commit;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod models;

// Re-export the client
pub use auth::{CredentialProvider, ResolvedAuth, sign_app_assertion};
pub use client::{ClientOptions, GitHubClient};
pub use commit::{
  BatchError, BatchOptions, CommitBatchResult, CommittedFile, FileCommitter, FileOutcome, commit_batch,
  validate_descriptors,
};
pub use error::{ApiError, AuthError, ErrorKind};
// Re-export models
pub use models::{ContentMetadata, InstallationToken, PutFileRequest, PutFileResponse};
