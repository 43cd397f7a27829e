use reqwest::{Method, StatusCode};
use tracing::instrument;

use crate::client::GitHubClient;
use crate::error::AuthError;
use crate::models::InstallationToken;

impl GitHubClient {
  /// Exchange the app assertion this client was built with for an
  /// installation access token.
  ///
  /// A rejected exchange keeps GitHub's status and raw response body.
  #[instrument(skip(self), level = "debug")]
  pub async fn create_installation_token(&self, installation_id: &str) -> Result<InstallationToken, AuthError> {
    let url = self
      .endpoint(["app", "installations", installation_id, "access_tokens"])
      .map_err(|e| AuthError::Transport(e.to_string()))?;
    let response = self
      .request(Method::POST, url)
      .send()
      .await
      .map_err(|e| AuthError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;

    match status {
      StatusCode::OK | StatusCode::CREATED => {
        serde_json::from_str::<InstallationToken>(&body).map_err(|e| AuthError::Decode(e.to_string()))
      }
      _ => Err(AuthError::Exchange { status, body }),
    }
  }
}
