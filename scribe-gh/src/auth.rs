//! # Credential Provider
//!
//! Resolves [`Credentials`] into the single Authorization header value used
//! for every call of a batch.
//!
//! A personal token is passed through as `token <value>`. A GitHub App
//! identity takes two steps: sign a short-lived RS256 assertion with the app's
//! private key, then exchange it for an installation access token. The
//! installation token is cached on the provider until shortly before the
//! expiry GitHub reported for it.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::header::HeaderValue;
use scribe_core::{AppCredential, Credentials};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{ClientOptions, GitHubClient};
use crate::consts::{ASSERTION_BACKDATE_SECS, ASSERTION_LIFETIME_SECS, TOKEN_REFRESH_MARGIN_SECS};
use crate::error::AuthError;

/// An Authorization header value ready to send
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedAuth {
  pub header_value: String,
  /// Absent for static tokens, which are never refreshed
  pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for ResolvedAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResolvedAuth")
      .field("header_value", &"<redacted>")
      .field("expires_at", &self.expires_at)
      .finish()
  }
}

#[derive(Clone)]
struct CachedToken {
  value: String,
  expires_at: DateTime<Utc>,
}

impl CachedToken {
  fn is_fresh(&self, now: DateTime<Utc>) -> bool {
    now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
  }
}

/// Claims of a GitHub App assertion
#[derive(Debug, Serialize, Deserialize)]
pub struct AppClaims {
  pub iat: i64,
  pub exp: i64,
  pub iss: String,
}

/// Sign an app assertion valid from `now - 60s` to `now + 600s`.
///
/// Backdating `iat` absorbs clock skew with GitHub; ten minutes is the
/// longest lifetime GitHub accepts.
pub fn sign_app_assertion(app_id: &str, private_key_pem: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
  let claims = AppClaims {
    iat: (now - Duration::seconds(ASSERTION_BACKDATE_SECS)).timestamp(),
    exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    iss: app_id.to_string(),
  };

  let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
    .map_err(|e| AuthError::CredentialFormat(format!("failed to parse RSA private key PEM: {e}")))?;

  encode(&Header::new(Algorithm::RS256), &claims, &key)
    .map_err(|e| AuthError::CredentialFormat(format!("failed to sign app assertion: {e}")))
}

/// `token <value>`, checked to be a valid HTTP header value so a bad secret
/// fails here instead of on every request of the batch
fn token_header(value: &str, what: &'static str) -> Result<String, AuthError> {
  let header = format!("token {value}");
  HeaderValue::from_str(&header).map_err(|_| AuthError::MalformedToken(what))?;
  Ok(header)
}

/// Turns one set of credentials into Authorization headers, caching
/// installation tokens for their validity window.
///
/// The cache lives on the instance. Share a provider across concurrent
/// batches only behind external synchronization.
pub struct CredentialProvider {
  credentials: Credentials,
  base_url: String,
  options: ClientOptions,
  cached: Option<CachedToken>,
  exchanges: usize,
}

impl CredentialProvider {
  pub fn new(credentials: Credentials, base_url: &str, options: &ClientOptions) -> Self {
    Self {
      credentials,
      base_url: base_url.to_string(),
      options: options.clone(),
      cached: None,
      exchanges: 0,
    }
  }

  /// Resolve the Authorization header for the configured credentials
  pub async fn resolve_auth_header(&mut self) -> Result<ResolvedAuth, AuthError> {
    match &self.credentials {
      Credentials::Token(token) => {
        // Secrets mounted from files usually end in a newline
        let value = token.value.trim();
        if value.is_empty() {
          return Err(AuthError::EmptyToken);
        }
        Ok(ResolvedAuth {
          header_value: token_header(value, "GitHub token")?,
          expires_at: None,
        })
      }
      Credentials::App(app) => {
        let app = app.clone();
        self.resolve_installation_token(&app).await
      }
    }
  }

  /// Number of installation token exchanges performed so far
  pub fn exchange_count(&self) -> usize {
    self.exchanges
  }

  async fn resolve_installation_token(&mut self, app: &AppCredential) -> Result<ResolvedAuth, AuthError> {
    let now = Utc::now();
    if let Some(cached) = self.cached.as_ref().filter(|cached| cached.is_fresh(now)) {
      debug!(
        installation_id = %app.installation_id,
        expires_at = %cached.expires_at,
        "Reusing cached installation token"
      );
      return Ok(ResolvedAuth {
        header_value: token_header(&cached.value, "installation token")?,
        expires_at: Some(cached.expires_at),
      });
    }

    let assertion = sign_app_assertion(&app.app_id, &app.private_key, now)?;
    let app_client = GitHubClient::new(&self.base_url, format!("Bearer {assertion}"), &self.options)
      .map_err(|e| AuthError::Transport(e.to_string()))?;

    info!(
      app_id = %app.app_id,
      installation_id = %app.installation_id,
      "Exchanging app assertion for installation token"
    );
    let token = app_client.create_installation_token(&app.installation_id).await?;
    self.exchanges += 1;

    info!(expires_at = %token.expires_at, "Obtained installation token");
    let resolved = ResolvedAuth {
      header_value: token_header(&token.token, "installation token")?,
      expires_at: Some(token.expires_at),
    };
    self.cached = Some(CachedToken {
      value: token.token,
      expires_at: token.expires_at,
    });

    Ok(resolved)
  }
}
