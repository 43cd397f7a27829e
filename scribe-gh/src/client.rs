//! # GitHub HTTP Client
//!
//! HTTP client for the GitHub REST API. A client carries one precomputed
//! Authorization header value, so the same client serves every call made on
//! behalf of a batch.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use scribe_core::Settings;
use scribe_core::consts::DEFAULT_TIMEOUT_SECS;
use url::Url;

use crate::auth::ResolvedAuth;
use crate::consts::{ACCEPT, API_VERSION, USER_AGENT};
use crate::error::ApiError;

/// Transport options shared by every client scribe builds
#[derive(Debug, Clone)]
pub struct ClientOptions {
  /// Upper bound for a single request, connect to last byte
  pub timeout: Duration,
  pub user_agent: String,
}

impl Default for ClientOptions {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      user_agent: USER_AGENT.to_string(),
    }
  }
}

impl ClientOptions {
  pub fn from_settings(settings: &Settings) -> Self {
    Self {
      timeout: settings.timeout(),
      user_agent: settings.user_agent.clone().unwrap_or_else(|| USER_AGENT.to_string()),
    }
  }
}

/// Represents a GitHub API client
pub struct GitHubClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) authorization: String,
}

impl GitHubClient {
  /// Create a client that sends `authorization` verbatim as the
  /// Authorization header
  pub fn new(base_url: &str, authorization: impl Into<String>, options: &ClientOptions) -> Result<Self, ApiError> {
    let client = Client::builder()
      .timeout(options.timeout)
      .user_agent(options.user_agent.clone())
      .build()?;

    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      authorization: authorization.into(),
    })
  }

  /// Create a client from a resolved credential
  pub fn from_auth(auth: &ResolvedAuth, base_url: &str, options: &ClientOptions) -> Result<Self, ApiError> {
    Self::new(base_url, auth.header_value.clone(), options)
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Build an endpoint URL from path segments. Each segment is
  /// percent-encoded as a whole, so a `/` inside a segment is escaped.
  pub(crate) fn endpoint<'a, I>(&self, segments: I) -> Result<Url, ApiError>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let invalid = |reason: &str| ApiError::InvalidUrl {
      url: self.base_url.clone(),
      reason: reason.to_string(),
    };

    let mut url = Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
    {
      let mut path = url.path_segments_mut().map_err(|()| invalid("URL cannot be a base"))?;
      path.pop_if_empty();
      path.extend(segments);
    }

    Ok(url)
  }

  /// Start a request with the standard GitHub headers
  pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
    self
      .client
      .request(method, url)
      .header("Authorization", &self.authorization)
      .header("Accept", ACCEPT)
      .header("X-GitHub-Api-Version", API_VERSION)
  }
}
