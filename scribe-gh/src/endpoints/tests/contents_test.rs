use scribe_core::RepoSlug;
use scribe_test_utils::github::{error_json, file_metadata_json, mount_existing_file, mount_missing_file, put_file_json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{ClientOptions, GitHubClient};
use crate::error::{ApiError, ErrorKind};
use crate::models::PutFileRequest;

fn create_test_client(server: &MockServer) -> GitHubClient {
  GitHubClient::new(&server.uri(), "token test_token", &ClientOptions::default()).unwrap()
}

fn repo() -> RepoSlug {
  RepoSlug::parse("owner/repo").unwrap()
}

#[tokio::test]
async fn test_get_file_metadata_existing() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/owner/repo/contents/deploy/app.yaml"))
    .and(query_param("ref", "develop"))
    .and(header("Authorization", "token test_token"))
    .respond_with(ResponseTemplate::new(200).set_body_json(file_metadata_json(
      "owner/repo",
      "deploy/app.yaml",
      "develop",
      "95b966ae1c166bd92f8ae7d1c313e738c731dfc3",
    )))
    .expect(1)
    .mount(&mock_server)
    .await;

  let metadata = client
    .get_file_metadata(&repo(), "deploy/app.yaml", "develop")
    .await?
    .expect("file should exist");

  assert_eq!(metadata.sha, "95b966ae1c166bd92f8ae7d1c313e738c731dfc3");
  assert_eq!(metadata.path, "deploy/app.yaml");
  Ok(())
}

#[tokio::test]
async fn test_get_file_metadata_missing_file() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);
  mount_missing_file(&mock_server, "owner/repo", "new.txt").await;

  let metadata = client.get_file_metadata(&repo(), "new.txt", "main").await?;
  assert!(metadata.is_none());
  Ok(())
}

#[tokio::test]
async fn test_get_file_metadata_missing_branch() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/owner/repo/contents/a.txt"))
    .respond_with(ResponseTemplate::new(404).set_body_json(error_json("No commit found for the ref nope")))
    .mount(&mock_server)
    .await;

  let err = client.get_file_metadata(&repo(), "a.txt", "nope").await.unwrap_err();
  assert!(matches!(&err, ApiError::BranchNotFound { branch, .. } if branch == "nope"));
  assert_eq!(err.kind(), ErrorKind::NotFound);
  Ok(())
}

#[tokio::test]
async fn test_get_file_metadata_directory_is_an_error() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/owner/repo/contents/deploy"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
        file_metadata_json("owner/repo", "deploy/a.yaml", "main", "abc")
    ])))
    .mount(&mock_server)
    .await;

  let err = client.get_file_metadata(&repo(), "deploy", "main").await.unwrap_err();
  assert!(err.to_string().contains("deploy is a directory"));
  Ok(())
}

#[tokio::test]
async fn test_get_file_metadata_unauthorized() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/owner/repo/contents/a.txt"))
    .respond_with(ResponseTemplate::new(401).set_body_json(error_json("Bad credentials")))
    .mount(&mock_server)
    .await;

  let err = client.get_file_metadata(&repo(), "a.txt", "main").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Authentication);
  assert!(err.to_string().contains("Bad credentials"));
  Ok(())
}

#[tokio::test]
async fn test_put_file_create_sends_body_without_sha() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);

  Mock::given(method("PUT"))
    .and(path("/repos/owner/repo/contents/docs/README.md"))
    .and(body_json(serde_json::json!({
        "message": "Add readme",
        "content": "IyBIZWxsbwo=",
        "branch": "main"
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(put_file_json(
      "owner/repo",
      "docs/README.md",
      "blob-new",
      "commit-new",
    )))
    .expect(1)
    .mount(&mock_server)
    .await;

  let request = PutFileRequest::new("Add readme", "# Hello\n", "main", None);
  let response = client.put_file(&repo(), "docs/README.md", &request).await?;

  assert_eq!(response.content.sha, "blob-new");
  assert_eq!(response.commit.sha, "commit-new");
  assert_eq!(
    response.content.html_url.as_deref(),
    Some("https://github.com/owner/repo/blob/commit-new/docs/README.md")
  );
  Ok(())
}

#[tokio::test]
async fn test_put_file_conflict() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);
  mount_existing_file(&mock_server, "owner/repo", "a.txt", "main", "current").await;

  Mock::given(method("PUT"))
    .and(path("/repos/owner/repo/contents/a.txt"))
    .respond_with(ResponseTemplate::new(409).set_body_json(error_json("a.txt does not match stale")))
    .mount(&mock_server)
    .await;

  let request = PutFileRequest::new("Update", "x", "main", Some("stale".to_string()));
  let err = client.put_file(&repo(), "a.txt", &request).await.unwrap_err();

  assert_eq!(err.kind(), ErrorKind::Conflict);
  Ok(())
}

#[tokio::test]
async fn test_put_file_encodes_path_segments() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_test_client(&mock_server);

  Mock::given(method("PUT"))
    .and(path("/repos/owner/repo/contents/notes/release%20notes.md"))
    .respond_with(ResponseTemplate::new(200).set_body_json(put_file_json(
      "owner/repo",
      "notes/release notes.md",
      "b1",
      "c1",
    )))
    .expect(1)
    .mount(&mock_server)
    .await;

  let request = PutFileRequest::new("Notes", "text", "main", None);
  let response = client.put_file(&repo(), "notes/release notes.md", &request).await?;

  assert_eq!(response.content.path, "notes/release notes.md");
  Ok(())
}
