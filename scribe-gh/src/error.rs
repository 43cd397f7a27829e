//! # GitHub API Error Classification
//!
//! Turns non-success responses into typed errors so callers can tell an
//! authentication problem from a missing repository, an oversized payload or
//! rate limiting without parsing message strings.

use std::fmt;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use thiserror::Error;

/// Failure of a single GitHub API call
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Authentication failed (HTTP {status}): {message}")]
  Unauthorized { status: StatusCode, message: String },
  #[error("Repository or path not found: {message}")]
  NotFound { message: String },
  #[error("Branch '{branch}' not found: {message}")]
  BranchNotFound { branch: String, message: String },
  #[error("Write rejected, the file changed since it was read: {message}")]
  Conflict { message: String },
  #[error("Content too large for the GitHub API: {message}")]
  PayloadTooLarge { message: String },
  #[error("GitHub API rate limit exceeded (HTTP {status}): {message}")]
  RateLimited { status: StatusCode, message: String },
  #[error("GitHub API error: HTTP {status} - {message}")]
  Unexpected { status: StatusCode, message: String },
  #[error("Invalid GitHub API URL '{url}': {reason}")]
  InvalidUrl { url: String, reason: String },
  #[error("Request to GitHub failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("Failed to parse {context}: {source}")]
  Decode {
    context: &'static str,
    #[source]
    source: serde_json::Error,
  },
}

/// Failure cause as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  Authentication,
  NotFound,
  Conflict,
  PayloadTooLarge,
  RateLimited,
  Api,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      ErrorKind::Authentication => "authentication failure",
      ErrorKind::NotFound => "not found",
      ErrorKind::Conflict => "conflict",
      ErrorKind::PayloadTooLarge => "payload too large",
      ErrorKind::RateLimited => "rate limited",
      ErrorKind::Api => "api error",
    };
    f.write_str(label)
  }
}

impl ApiError {
  /// Classify a non-success response from its parts
  pub fn classify(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
    let message = extract_message(status, body);
    let rate_limit_exhausted = headers
      .get("x-ratelimit-remaining")
      .and_then(|value| value.to_str().ok())
      .is_some_and(|value| value.trim() == "0");

    match status {
      StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { status, message },
      StatusCode::FORBIDDEN if rate_limit_exhausted || is_rate_limit_message(&message) => {
        ApiError::RateLimited { status, message }
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { status, message },
      StatusCode::NOT_FOUND => ApiError::NotFound { message },
      StatusCode::CONFLICT => ApiError::Conflict { message },
      StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge { message },
      StatusCode::UNPROCESSABLE_ENTITY if message.to_lowercase().contains("too large") => {
        ApiError::PayloadTooLarge { message }
      }
      // Updating an existing file without its blob SHA
      StatusCode::UNPROCESSABLE_ENTITY if message.contains("\"sha\" wasn't supplied") => ApiError::Conflict { message },
      _ => ApiError::Unexpected { status, message },
    }
  }

  /// Read the body of a failed response and classify it
  pub(crate) async fn from_response(response: reqwest::Response) -> Self {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    Self::classify(status, &headers, &body)
  }

  /// The cause category callers branch on
  pub fn kind(&self) -> ErrorKind {
    match self {
      ApiError::Unauthorized { .. } => ErrorKind::Authentication,
      ApiError::NotFound { .. } | ApiError::BranchNotFound { .. } => ErrorKind::NotFound,
      ApiError::Conflict { .. } => ErrorKind::Conflict,
      ApiError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
      ApiError::RateLimited { .. } => ErrorKind::RateLimited,
      ApiError::Unexpected { .. } | ApiError::InvalidUrl { .. } | ApiError::Transport(_) | ApiError::Decode { .. } => {
        ErrorKind::Api
      }
    }
  }
}

/// Failure to turn credentials into an Authorization header
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("GitHub token must not be empty")]
  EmptyToken,
  #[error("{0} contains characters that are not allowed in an HTTP header")]
  MalformedToken(&'static str),
  #[error("Invalid GitHub App private key: {0}")]
  CredentialFormat(String),
  #[error("Installation token exchange rejected (HTTP {status}): {body}")]
  Exchange { status: StatusCode, body: String },
  #[error("Installation token exchange failed: {0}")]
  Transport(String),
  #[error("Failed to parse installation token response: {0}")]
  Decode(String),
}

/// Pull GitHub's `message` out of a JSON error body, falling back to the raw
/// body and then to the status reason.
fn extract_message(status: StatusCode, body: &str) -> String {
  if let Ok(json) = serde_json::from_str::<serde_json::Value>(body)
    && let Some(message) = json.get("message").and_then(|m| m.as_str())
  {
    return message.to_string();
  }

  let trimmed = body.trim();
  if trimmed.is_empty() {
    status.canonical_reason().unwrap_or("no response body").to_string()
  } else {
    trimmed.to_string()
  }
}

fn is_rate_limit_message(message: &str) -> bool {
  let lower = message.to_lowercase();
  lower.contains("rate limit") || lower.contains("abuse detection")
}

#[cfg(test)]
mod tests {
  use reqwest::header::HeaderValue;

  use super::*;

  fn classify(status: u16, body: &str) -> ApiError {
    ApiError::classify(StatusCode::from_u16(status).unwrap(), &HeaderMap::new(), body)
  }

  #[test]
  fn test_auth_statuses() {
    assert_eq!(classify(401, r#"{"message":"Bad credentials"}"#).kind(), ErrorKind::Authentication);
    assert_eq!(
      classify(403, r#"{"message":"Resource not accessible by integration"}"#).kind(),
      ErrorKind::Authentication
    );
  }

  #[test]
  fn test_rate_limit_detection() {
    assert_eq!(classify(429, "").kind(), ErrorKind::RateLimited);
    assert_eq!(
      classify(403, r#"{"message":"API rate limit exceeded for installation ID 1."}"#).kind(),
      ErrorKind::RateLimited
    );

    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    let err = ApiError::classify(StatusCode::FORBIDDEN, &headers, r#"{"message":"Forbidden"}"#);
    assert_eq!(err.kind(), ErrorKind::RateLimited);
  }

  #[test]
  fn test_payload_too_large() {
    assert_eq!(classify(413, "").kind(), ErrorKind::PayloadTooLarge);
    assert_eq!(
      classify(422, r#"{"message":"This file is too large to be processed"}"#).kind(),
      ErrorKind::PayloadTooLarge
    );
    assert_eq!(classify(422, r#"{"message":"Invalid request"}"#).kind(), ErrorKind::Api);
  }

  #[test]
  fn test_not_found_and_conflict() {
    let err = classify(404, r#"{"message":"Not Found"}"#);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Repository or path not found: Not Found");

    assert_eq!(classify(409, r#"{"message":"sha does not match"}"#).kind(), ErrorKind::Conflict);
    assert_eq!(
      classify(422, r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#).kind(),
      ErrorKind::Conflict
    );
  }

  #[test]
  fn test_message_falls_back_to_body_then_reason() {
    let err = classify(500, "upstream exploded");
    assert_eq!(err.to_string(), "GitHub API error: HTTP 500 Internal Server Error - upstream exploded");

    let err = classify(502, "   ");
    assert!(err.to_string().ends_with("Bad Gateway"));
  }

  #[test]
  fn test_error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorKind::PayloadTooLarge).unwrap();
    assert_eq!(json, "\"payload_too_large\"");
    assert_eq!(ErrorKind::RateLimited.to_string(), "rate limited");
  }
}
