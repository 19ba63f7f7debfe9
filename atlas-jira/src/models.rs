use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub enum JiraAuth {
  /// Username plus API token (Jira Cloud) or password (Server/Data Center).
  Basic { username: String, api_token: String },
  /// OAuth 2.0 access token or personal access token.
  Bearer { token: String },
}

impl fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Basic { username, .. } => f
        .debug_struct("Basic")
        .field("username", username)
        .field("api_token", &"<redacted>")
        .finish(),
      Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
    }
  }
}

/// Options for fetching a single issue.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
  /// Comma-separated field names or `*all`. `None` leaves the choice to Jira.
  pub fields: Option<String>,
  /// Comma-separated expansions such as `renderedFields` or `changelog`.
  pub expand: Option<String>,
  /// Maximum number of comments kept on the returned issue.
  pub comment_limit: u32,
}

impl IssueQuery {
  /// The `fields` parameter actually sent to Jira. Comments are requested
  /// implicitly whenever `comment_limit` asks for some.
  pub(crate) fn upstream_fields(&self) -> Option<String> {
    let fields = self.fields.as_deref().map(str::trim).filter(|f| !f.is_empty())?;
    let has_comments = fields
      .split(',')
      .map(str::trim)
      .any(|f| f == "comment" || f == "*all");
    if self.comment_limit == 0 || has_comments {
      Some(fields.to_string())
    } else {
      Some(format!("{fields},comment"))
    }
  }
}

/// Options for a JQL search.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  pub jql: String,
  pub fields: Option<String>,
  pub max_results: u32,
  pub start_at: u64,
}

/// Error payload Jira returns alongside 4xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct JiraErrorBody {
  #[serde(default, rename = "errorMessages")]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: Map<String, Value>,
}

impl JiraErrorBody {
  /// Flatten every message into one line, or `None` when Jira sent nothing
  /// useful.
  pub(crate) fn summary(&self) -> Option<String> {
    let mut messages = self.error_messages.clone();
    for (field, message) in &self.errors {
      match message {
        Value::String(text) => messages.push(format!("{field}: {text}")),
        other => messages.push(format!("{field}: {other}")),
      }
    }
    if messages.is_empty() {
      None
    } else {
      Some(messages.join("; "))
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_jira_auth_debug_redacts_secrets() {
    let basic = JiraAuth::Basic {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };
    let rendered = format!("{basic:?}");
    assert!(rendered.contains("test_user"));
    assert!(!rendered.contains("test_token"));

    let bearer = JiraAuth::Bearer {
      token: "oauth-token".to_string(),
    };
    assert!(!format!("{bearer:?}").contains("oauth-token"));
  }

  #[test]
  fn test_upstream_fields_adds_comment_when_limit_set() {
    let query = IssueQuery {
      fields: Some("summary,status".into()),
      expand: None,
      comment_limit: 5,
    };
    assert_eq!(query.upstream_fields().as_deref(), Some("summary,status,comment"));
  }

  #[test]
  fn test_upstream_fields_untouched_without_comment_limit() {
    let query = IssueQuery {
      fields: Some("summary,status".into()),
      expand: None,
      comment_limit: 0,
    };
    assert_eq!(query.upstream_fields().as_deref(), Some("summary,status"));
  }

  #[test]
  fn test_upstream_fields_does_not_duplicate_comment() {
    let query = IssueQuery {
      fields: Some("summary, comment".into()),
      expand: None,
      comment_limit: 3,
    };
    assert_eq!(query.upstream_fields().as_deref(), Some("summary, comment"));

    let query = IssueQuery {
      fields: Some("*all".into()),
      expand: None,
      comment_limit: 3,
    };
    assert_eq!(query.upstream_fields().as_deref(), Some("*all"));
  }

  #[test]
  fn test_upstream_fields_blank_means_jira_default() {
    let query = IssueQuery {
      fields: Some("  ".into()),
      expand: None,
      comment_limit: 10,
    };
    assert!(query.upstream_fields().is_none());
  }

  #[test]
  fn test_error_body_summary() {
    let body: JiraErrorBody = serde_json::from_value(json!({
        "errorMessages": ["Error in the JQL Query: Expecting operator"],
        "errors": { "jql": "bad token" }
    }))
    .unwrap();
    assert_eq!(
      body.summary().as_deref(),
      Some("Error in the JQL Query: Expecting operator; jql: bad token")
    );

    assert!(JiraErrorBody::default().summary().is_none());
  }
}
