//! Canned GitHub API responses for wiremock-backed tests
//!
//! Each `mount_*` helper registers one mock on the given server. Callers that
//! need stricter request matching (body contents, call counts) build their own
//! `Mock` from the JSON builders instead.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the contents endpoint for `repository` (`owner/name`) and `file`
pub fn contents_path(repository: &str, file: &str) -> String {
  format!("/repos/{repository}/contents/{file}")
}

/// Body of a successful `GET /repos/{repo}/contents/{path}` for a file
pub fn file_metadata_json(repository: &str, file: &str, branch: &str, sha: &str) -> Value {
  let name = file.rsplit('/').next().unwrap_or(file);
  json!({
    "type": "file",
    "encoding": "base64",
    "size": 12,
    "name": name,
    "path": file,
    "content": "aGVsbG8gd29ybGQK\n",
    "sha": sha,
    "url": format!("https://api.github.com/repos/{repository}/contents/{file}?ref={branch}"),
    "html_url": format!("https://github.com/{repository}/blob/{branch}/{file}"),
    "download_url": format!("https://raw.githubusercontent.com/{repository}/{branch}/{file}")
  })
}

/// Body of a successful `PUT /repos/{repo}/contents/{path}`
pub fn put_file_json(repository: &str, file: &str, blob_sha: &str, commit_sha: &str) -> Value {
  let name = file.rsplit('/').next().unwrap_or(file);
  json!({
    "content": {
      "name": name,
      "path": file,
      "sha": blob_sha,
      "size": 12,
      "url": format!("https://api.github.com/repos/{repository}/contents/{file}"),
      "html_url": format!("https://github.com/{repository}/blob/{commit_sha}/{file}"),
      "type": "file"
    },
    "commit": {
      "sha": commit_sha,
      "html_url": format!("https://github.com/{repository}/commit/{commit_sha}"),
      "message": "test commit"
    }
  })
}

/// Body of a GitHub error response
pub fn error_json(message: &str) -> Value {
  json!({
    "message": message,
    "documentation_url": "https://docs.github.com/rest"
  })
}

/// Body of a successful installation access token exchange
pub fn installation_token_json(token: &str, expires_at: &str) -> Value {
  json!({
    "token": token,
    "expires_at": expires_at,
    "permissions": { "contents": "write" },
    "repository_selection": "selected"
  })
}

/// The file exists on `branch` with blob `sha`
pub async fn mount_existing_file(server: &MockServer, repository: &str, file: &str, branch: &str, sha: &str) {
  Mock::given(method("GET"))
    .and(path(contents_path(repository, file)))
    .and(query_param("ref", branch))
    .respond_with(ResponseTemplate::new(200).set_body_json(file_metadata_json(repository, file, branch, sha)))
    .mount(server)
    .await;
}

/// The file does not exist (plain 404)
pub async fn mount_missing_file(server: &MockServer, repository: &str, file: &str) {
  Mock::given(method("GET"))
    .and(path(contents_path(repository, file)))
    .respond_with(ResponseTemplate::new(404).set_body_json(error_json("Not Found")))
    .mount(server)
    .await;
}

/// Any request for the file's contents path fails with `status`
pub async fn mount_contents_error(server: &MockServer, repository: &str, file: &str, status: u16, message: &str) {
  Mock::given(path(contents_path(repository, file)))
    .respond_with(ResponseTemplate::new(status).set_body_json(error_json(message)))
    .mount(server)
    .await;
}

/// A write to the file succeeds with the given new blob and commit SHAs
pub async fn mount_put_file(server: &MockServer, repository: &str, file: &str, blob_sha: &str, commit_sha: &str) {
  Mock::given(method("PUT"))
    .and(path(contents_path(repository, file)))
    .respond_with(ResponseTemplate::new(201).set_body_json(put_file_json(repository, file, blob_sha, commit_sha)))
    .mount(server)
    .await;
}

/// The installation token exchange succeeds exactly `expected_calls` times
pub async fn mount_installation_token(
  server: &MockServer,
  installation_id: &str,
  token: &str,
  expires_at: &str,
  expected_calls: u64,
) {
  Mock::given(method("POST"))
    .and(path(format!("/app/installations/{installation_id}/access_tokens")))
    .respond_with(ResponseTemplate::new(201).set_body_json(installation_token_json(token, expires_at)))
    .expect(expected_calls)
    .mount(server)
    .await;
}
