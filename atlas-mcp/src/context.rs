//! Jira-backed [`Gateway`] with a lazily constructed client.

use std::path::PathBuf;

use atlas_core::JiraSettings;
use atlas_jira::{IssueQuery, JiraClient, SearchQuery};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::types::{IssueRequest, SearchRequest};

/// Gateway that talks to a real Jira instance.
///
/// Credentials are resolved on the first call rather than at startup, so the
/// server can advertise its tools even when Jira is not configured. The
/// outcome, success or failure, is kept for the lifetime of the gateway.
pub struct JiraGateway {
  settings: JiraSettings,
  home_dir: PathBuf,
  client: OnceCell<Result<JiraClient, String>>,
}

impl JiraGateway {
  pub fn new(settings: JiraSettings, home_dir: PathBuf) -> Self {
    Self {
      settings,
      home_dir,
      client: OnceCell::new(),
    }
  }

  /// Build a gateway around an existing client.
  pub fn with_client(client: JiraClient) -> Self {
    Self {
      settings: JiraSettings::default(),
      home_dir: PathBuf::new(),
      client: OnceCell::new_with(Some(Ok(client))),
    }
  }

  /// Lazily initialise and return the Jira client.
  async fn client(&self) -> Result<&JiraClient, GatewayError> {
    let client = self
      .client
      .get_or_init(|| async {
        debug!("Initialising Jira client");
        atlas_jira::create_jira_client_from_settings(&self.settings, &self.home_dir).map_err(|e| format!("{e:#}"))
      })
      .await;

    client.as_ref().map_err(|message| GatewayError::msg(message.clone()))
  }
}

impl Gateway for JiraGateway {
  async fn fetch_issue(&self, request: &IssueRequest) -> Result<Value, GatewayError> {
    let client = self.client().await?;
    let query = IssueQuery {
      fields: Some(request.fields.clone()),
      expand: request.expand.clone(),
      comment_limit: request.comment_limit,
    };
    Ok(client.get_issue(&request.key, &query).await?)
  }

  async fn search(&self, request: &SearchRequest) -> Result<Value, GatewayError> {
    let client = self.client().await?;
    let query = SearchQuery {
      jql: request.jql.clone(),
      fields: Some(request.fields.clone()),
      max_results: request.limit,
      start_at: request.start_at,
    };
    Ok(client.search_issues(&query).await?)
  }
}
