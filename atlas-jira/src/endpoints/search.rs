//! # Jira Search Endpoint
//!
//! JQL search returning one page of issues.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::client::{JiraClient, read_json};
use crate::models::SearchQuery;

impl JiraClient {
  /// Run a JQL search and return the raw result page
  /// (`total`, `startAt`, `maxResults`, `issues`).
  pub async fn search_issues(&self, query: &SearchQuery) -> Result<Value> {
    let url = self.endpoint(&["search"])?;

    let mut params: Vec<(&str, String)> = vec![
      ("jql", query.jql.clone()),
      ("startAt", query.start_at.to_string()),
      ("maxResults", query.max_results.to_string()),
    ];
    if let Some(fields) = query.fields.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
      params.push(("fields", fields.to_string()));
    }

    debug!(jql = %query.jql, start_at = query.start_at, max_results = query.max_results, "Searching Jira");

    let response = self
      .get(url)
      .query(&params)
      .send()
      .await
      .context("Failed to search Jira issues")?;

    read_json(response, "Search endpoint not found".to_string(), "Invalid JQL query").await
  }
}
