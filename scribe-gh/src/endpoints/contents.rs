//! # Repository Contents Endpoints
//!
//! Existence check and create-or-update for a single file at a path on a
//! branch.

use reqwest::{Method, StatusCode};
use scribe_core::RepoSlug;
use tracing::instrument;

use crate::client::GitHubClient;
use crate::error::ApiError;
use crate::models::{ContentMetadata, PutFileRequest, PutFileResponse};

/// Prefix of GitHub's 404 message when the `ref` itself does not exist
const MISSING_REF_MESSAGE: &str = "No commit found for the ref";

impl GitHubClient {
  /// Fetch metadata for the file at `path` on `branch`.
  ///
  /// Returns `Ok(None)` when the file does not exist. GitHub answers a missing
  /// repository with the same 404, so that case surfaces on the write instead.
  #[instrument(skip(self, repo), fields(repo = %repo), level = "debug")]
  pub async fn get_file_metadata(
    &self,
    repo: &RepoSlug,
    path: &str,
    branch: &str,
  ) -> Result<Option<ContentMetadata>, ApiError> {
    let mut url = self.contents_url(repo, path)?;
    url.query_pairs_mut().append_pair("ref", branch);

    let response = self.request(Method::GET, url).send().await?;

    match response.status() {
      StatusCode::OK => {
        let body = response.text().await?;
        let json: serde_json::Value = serde_json::from_str(&body).map_err(|source| ApiError::Decode {
          context: "file metadata",
          source,
        })?;

        // A directory listing comes back as an array
        if json.is_array() {
          return Err(ApiError::Unexpected {
            status: StatusCode::OK,
            message: format!("{path} is a directory"),
          });
        }

        let metadata = serde_json::from_value(json).map_err(|source| ApiError::Decode {
          context: "file metadata",
          source,
        })?;
        Ok(Some(metadata))
      }
      StatusCode::NOT_FOUND => match ApiError::from_response(response).await {
        ApiError::NotFound { message } if message.starts_with(MISSING_REF_MESSAGE) => Err(ApiError::BranchNotFound {
          branch: branch.to_string(),
          message,
        }),
        ApiError::NotFound { .. } => Ok(None),
        other => Err(other),
      },
      _ => Err(ApiError::from_response(response).await),
    }
  }

  /// Create or update the file at `path`. The request must carry the current
  /// blob SHA when the file already exists.
  #[instrument(skip(self, repo, request), fields(repo = %repo, branch = %request.branch, update = request.sha.is_some()), level = "debug")]
  pub async fn put_file(&self, repo: &RepoSlug, path: &str, request: &PutFileRequest) -> Result<PutFileResponse, ApiError> {
    let url = self.contents_url(repo, path)?;
    let response = self.request(Method::PUT, url).json(request).send().await?;

    match response.status() {
      StatusCode::OK | StatusCode::CREATED => {
        let body = response.text().await?;
        serde_json::from_str::<PutFileResponse>(&body).map_err(|source| ApiError::Decode {
          context: "create-or-update response",
          source,
        })
      }
      _ => Err(ApiError::from_response(response).await),
    }
  }

  fn contents_url(&self, repo: &RepoSlug, path: &str) -> Result<url::Url, ApiError> {
    let segments = ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
      .into_iter()
      .chain(path.split('/').filter(|part| !part.is_empty()));
    self.endpoint(segments)
  }
}
