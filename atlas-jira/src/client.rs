//! # Jira HTTP Client
//!
//! HTTP client implementation for Jira REST API interactions, handling
//! authentication, request building, and mapping of HTTP failures to
//! readable errors.

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::consts::{ACCEPT, API_PREFIX, USER_AGENT};
use crate::models::{JiraAuth, JiraErrorBody};

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client
  pub fn new(base_url: &str, auth: JiraAuth) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  /// The REST base URL this client talks to.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Build the URL of a REST API v2 endpoint. Segments are percent-encoded,
  /// so caller-supplied values such as issue keys cannot escape the path.
  pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&self.base_url).with_context(|| format!("Invalid Jira base URL: {}", self.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow::anyhow!("Jira base URL cannot carry a path: {}", self.base_url))?
      .pop_if_empty()
      .extend(API_PREFIX)
      .extend(segments);
    Ok(url)
  }

  /// Start an authenticated GET request.
  pub(crate) fn get(&self, url: Url) -> RequestBuilder {
    let request = self
      .client
      .get(url)
      .header("User-Agent", USER_AGENT)
      .header("Accept", ACCEPT);

    match &self.auth {
      JiraAuth::Basic { username, api_token } => request.basic_auth(username, Some(api_token)),
      JiraAuth::Bearer { token } => request.bearer_auth(token),
    }
  }
}

/// Decode a successful response as JSON, or turn the status into an error.
///
/// `not_found` and `bad_request` phrase the 404 and 400 cases for the
/// endpoint being called.
pub(crate) async fn read_json(response: Response, not_found: String, bad_request: &str) -> Result<Value> {
  let status = response.status();
  if status.is_success() {
    return response.json::<Value>().await.context("Failed to parse Jira response");
  }

  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
      "Authentication failed. Please check your Jira credentials."
    )),
    StatusCode::NOT_FOUND => Err(anyhow::anyhow!(not_found)),
    StatusCode::BAD_REQUEST => {
      let body = response.text().await.unwrap_or_default();
      let details = serde_json::from_str::<JiraErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.summary())
        .unwrap_or(body);
      Err(anyhow::anyhow!("{bad_request}: {details}"))
    }
    _ => Err(anyhow::anyhow!(
      "Unexpected error: HTTP {} - {}",
      status,
      response.text().await.unwrap_or_default()
    )),
  }
}

/// Create a Jira client from a base URL and resolved authentication
pub fn create_jira_client(base_url: &str, auth: JiraAuth) -> JiraClient {
  JiraClient::new(base_url, auth)
}
