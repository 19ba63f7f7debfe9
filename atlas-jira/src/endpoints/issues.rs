//! # Jira Issue Endpoints
//!
//! Fetching a single Jira issue by key.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::client::{JiraClient, read_json};
use crate::models::IssueQuery;

impl JiraClient {
  /// Get a Jira issue by key.
  ///
  /// The issue comes back as Jira sent it, except that the comment list (when
  /// present) is cut down to `query.comment_limit` entries.
  pub async fn get_issue(&self, issue_key: &str, query: &IssueQuery) -> Result<Value> {
    let url = self.endpoint(&["issue", issue_key])?;

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(fields) = query.upstream_fields() {
      params.push(("fields", fields));
    }
    if let Some(expand) = query.expand.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
      params.push(("expand", expand.to_string()));
    }

    let response = self
      .get(url)
      .query(&params)
      .send()
      .await
      .context("Failed to fetch Jira issue")?;

    let mut issue = read_json(response, format!("Issue {issue_key} not found"), "Invalid issue request").await?;

    if let Some(comments) = issue
      .pointer_mut("/fields/comment/comments")
      .and_then(Value::as_array_mut)
    {
      let limit = usize::try_from(query.comment_limit).unwrap_or(usize::MAX);
      if comments.len() > limit {
        debug!(issue_key, total = comments.len(), limit, "Truncating issue comments");
        comments.truncate(limit);
      }
    }

    Ok(issue)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{basic_auth, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::models::{IssueQuery, JiraAuth};

  fn basic_client(base_url: &str, api_token: &str) -> JiraClient {
    let auth = JiraAuth::Basic {
      username: "test_user".to_string(),
      api_token: api_token.to_string(),
    };
    JiraClient::new(base_url, auth)
  }

  #[tokio::test]
  async fn test_get_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = basic_client(&mock_server.uri(), "test_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .and(basic_auth("test_user", "test_token"))
      .and(query_param("fields", "summary,status"))
      .and(query_param("expand", "renderedFields"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "id": "10000",
          "key": "TEST-123",
          "fields": {
              "summary": "Test issue",
              "status": {
                  "id": "10001",
                  "name": "In Progress",
                  "statusCategory": {
                      "id": 4,
                      "key": "indeterminate",
                      "name": "In Progress"
                  }
              }
          }
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let query = IssueQuery {
      fields: Some("summary,status".into()),
      expand: Some("renderedFields".into()),
      comment_limit: 0,
    };
    let issue = client.get_issue("TEST-123", &query).await?;
    assert_eq!(issue["key"], "TEST-123");
    assert_eq!(issue["fields"]["status"]["name"], "In Progress");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_truncates_comments() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = basic_client(&mock_server.uri(), "test_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-7"))
      .and(query_param("fields", "summary,comment"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "key": "TEST-7",
          "fields": {
              "summary": "Chatty issue",
              "comment": {
                  "total": 3,
                  "comments": [
                      { "id": "1", "body": "first" },
                      { "id": "2", "body": "second" },
                      { "id": "3", "body": "third" }
                  ]
              }
          }
      })))
      .mount(&mock_server)
      .await;

    let query = IssueQuery {
      fields: Some("summary".into()),
      expand: None,
      comment_limit: 2,
    };
    let issue = client.get_issue("TEST-7", &query).await?;
    let comments = issue["fields"]["comment"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["body"], "first");
    assert_eq!(comments[1]["body"], "second");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = basic_client(&mock_server.uri(), "test_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_issue("NONEXISTENT-123", &IssueQuery::default()).await;
    assert!(result.unwrap_err().to_string().contains("Issue NONEXISTENT-123 not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = basic_client(&mock_server.uri(), "invalid_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
          "errorMessages": ["Authentication failed"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_issue("TEST-123", &IssueQuery::default()).await;
    assert!(result.unwrap_err().to_string().contains("Authentication failed"));

    Ok(())
  }
}
