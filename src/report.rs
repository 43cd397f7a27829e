//! # Batch Report
//!
//! The harness-facing summary of a run: a ready flag, a severity, a reason
//! string and a structured context carrying every per-file outcome.

use std::fmt;

use scribe_core::{format_repo_path, print_error, print_info, print_success, print_warning};
use scribe_gh::CommitBatchResult;
use serde::Serialize;
use serde_json::{Value, json};

/// Key under which the batch details are published in the report context
pub const CONTEXT_KEY: &str = "github-file-manager";

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  /// Every file was committed
  Normal,
  /// Some files failed
  Warning,
  /// Nothing was attempted
  Fatal,
}

impl Severity {
  pub fn exit_code(self) -> u8 {
    match self {
      Severity::Normal => 0,
      Severity::Fatal => 1,
      Severity::Warning => 2,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub ready: bool,
  pub severity: Severity,
  pub reason: String,
  pub context: Value,
  /// Per-file outcomes again, for the text renderer
  #[serde(skip)]
  batch: Option<CommitBatchResult>,
}

impl Report {
  /// Summarize a finished batch
  pub fn from_batch(result: CommitBatchResult) -> Self {
    let (severity, reason) = if result.overall_success {
      (
        Severity::Normal,
        format!("Successfully committed {} files to GitHub", result.processed_count),
      )
    } else {
      let breakdown = result
        .error_kinds()
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
      (
        Severity::Warning,
        format!(
          "GitHub file manager completed with {} errors ({breakdown}). Check context for details.",
          result.errors.len()
        ),
      )
    };

    let context = json!({
      CONTEXT_KEY: {
        "success": result.overall_success,
        "filesProcessed": result.processed_count,
        "results": result.outcomes,
        "errors": result.errors,
      }
    });

    Self {
      ready: result.overall_success,
      severity,
      reason,
      context,
      batch: Some(result),
    }
  }

  /// A run that failed before any file was attempted
  pub fn fatal(error: impl fmt::Display) -> Self {
    let reason = format!("Function failed: {error}");
    let context = json!({
      CONTEXT_KEY: {
        "success": false,
        "error": reason,
      }
    });

    Self {
      ready: false,
      severity: Severity::Fatal,
      reason,
      context,
      batch: None,
    }
  }

  /// Print one line per file followed by the reason
  pub fn print_text(&self) {
    if let Some(batch) = &self.batch {
      for outcome in &batch.outcomes {
        let target = format_repo_path(&outcome.repository, &outcome.path, &outcome.branch);
        match (&outcome.sha, &outcome.error) {
          (Some(sha), _) => {
            let action = if outcome.created == Some(true) { "created" } else { "updated" };
            print_success(&format!("{target} {action} ({sha})"));
          }
          (None, Some(error)) => print_error(&format!("{target}: {error}")),
          (None, None) => print_info(&target),
        }
      }
    }

    match self.severity {
      Severity::Normal => print_success(&self.reason),
      Severity::Warning => print_warning(&self.reason),
      Severity::Fatal => print_error(&self.reason),
    }
  }
}

#[cfg(test)]
mod tests {
  use scribe_gh::{ErrorKind, FileOutcome};

  use super::*;

  fn outcome(path: &str, error_kind: Option<ErrorKind>) -> FileOutcome {
    let success = error_kind.is_none();
    FileOutcome {
      path: path.to_string(),
      repository: "acme/infra".to_string(),
      branch: "main".to_string(),
      success,
      sha: success.then(|| "3a0f86f".to_string()),
      commit_sha: success.then(|| "7638417".to_string()),
      url: success.then(|| format!("https://github.com/acme/infra/blob/7638417/{path}")),
      created: success.then_some(true),
      error: error_kind.map(|_| "Repository or path not found: Not Found".to_string()),
      error_kind,
    }
  }

  fn batch(outcomes: Vec<FileOutcome>) -> CommitBatchResult {
    let errors = outcomes
      .iter()
      .filter_map(|o| o.error.as_ref().map(|e| format!("Failed to process file {}: {e}", o.path)))
      .collect();
    CommitBatchResult {
      overall_success: outcomes.iter().all(|o| o.success),
      processed_count: outcomes.len(),
      outcomes,
      errors,
    }
  }

  #[test]
  fn test_successful_batch_is_ready() {
    let report = Report::from_batch(batch(vec![outcome("a.yaml", None), outcome("b.yaml", None)]));

    assert!(report.ready);
    assert_eq!(report.severity, Severity::Normal);
    assert_eq!(report.reason, "Successfully committed 2 files to GitHub");
    assert_eq!(report.severity.exit_code(), 0);
  }

  #[test]
  fn test_partial_failure_reason_lists_kinds() {
    let report = Report::from_batch(batch(vec![
      outcome("a.yaml", None),
      outcome("b.yaml", Some(ErrorKind::NotFound)),
    ]));

    assert!(!report.ready);
    assert_eq!(report.severity, Severity::Warning);
    assert_eq!(
      report.reason,
      "GitHub file manager completed with 1 errors (not found: 1). Check context for details."
    );
    assert_eq!(report.severity.exit_code(), 2);
  }

  #[test]
  fn test_partial_failure_report_snapshot() {
    let report = Report::from_batch(batch(vec![
      outcome("deploy/app.yaml", None),
      outcome("deploy/missing.yaml", Some(ErrorKind::NotFound)),
    ]));

    insta::with_settings!({ sort_maps => true }, {
      insta::assert_json_snapshot!(report, @r#"
      {
        "ready": false,
        "severity": "warning",
        "reason": "GitHub file manager completed with 1 errors (not found: 1). Check context for details.",
        "context": {
          "github-file-manager": {
            "errors": [
              "Failed to process file deploy/missing.yaml: Repository or path not found: Not Found"
            ],
            "filesProcessed": 2,
            "results": [
              {
                "branch": "main",
                "commitSha": "7638417",
                "created": true,
                "path": "deploy/app.yaml",
                "repository": "acme/infra",
                "sha": "3a0f86f",
                "success": true,
                "url": "https://github.com/acme/infra/blob/7638417/deploy/app.yaml"
              },
              {
                "branch": "main",
                "error": "Repository or path not found: Not Found",
                "errorKind": "not_found",
                "path": "deploy/missing.yaml",
                "repository": "acme/infra",
                "success": false
              }
            ],
            "success": false
          }
        }
      }
      "#);
    });
  }

  #[test]
  fn test_fatal_report() {
    let report = Report::fatal("At least one file must be specified");

    assert!(!report.ready);
    assert_eq!(report.severity.exit_code(), 1);
    assert_eq!(report.reason, "Function failed: At least one file must be specified");
    assert_eq!(
      report.context[CONTEXT_KEY]["error"],
      "Function failed: At least one file must be specified"
    );
    assert!(report.batch.is_none());
  }
}
