//! # Configuration
//!
//! Jira connection settings gathered from the environment, optionally
//! overridden by command-line flags. Nothing here performs I/O beyond reading
//! environment variables, so the settings can be built once at startup and
//! handed to whichever component needs them.

use anyhow::Result;

use crate::consts::{ENV_JIRA_ACCESS_TOKEN, ENV_JIRA_API_TOKEN, ENV_JIRA_CLOUD_ID, ENV_JIRA_HOST, ENV_JIRA_USERNAME};
use crate::creds::Credentials;
use crate::url::{cloud_base_url, ensure_url_scheme};

/// Connection settings for a Jira instance.
#[derive(Debug, Clone, Default)]
pub struct JiraSettings {
  pub host: Option<String>,
  pub cloud_id: Option<String>,
  pub access_token: Option<String>,
  pub username: Option<String>,
  pub api_token: Option<String>,
}

impl JiraSettings {
  /// Read every setting from its environment variable. Blank values count as
  /// unset.
  pub fn from_env() -> Self {
    Self {
      host: read_env(ENV_JIRA_HOST),
      cloud_id: read_env(ENV_JIRA_CLOUD_ID),
      access_token: read_env(ENV_JIRA_ACCESS_TOKEN),
      username: read_env(ENV_JIRA_USERNAME),
      api_token: read_env(ENV_JIRA_API_TOKEN),
    }
  }

  /// Override the host when a non-blank value is given.
  pub fn with_host(mut self, host: Option<String>) -> Self {
    if let Some(host) = non_blank(host) {
      self.host = Some(host);
    }
    self
  }

  /// Override the Cloud id when a non-blank value is given.
  pub fn with_cloud_id(mut self, cloud_id: Option<String>) -> Self {
    if let Some(cloud_id) = non_blank(cloud_id) {
      self.cloud_id = Some(cloud_id);
    }
    self
  }

  /// Resolve the REST base URL.
  ///
  /// A Cloud id takes precedence and routes through the Atlassian API
  /// gateway; otherwise the host is used, defaulting to https:// when it has
  /// no scheme.
  pub fn base_url(&self) -> Result<String> {
    if let Some(cloud_id) = &self.cloud_id {
      return cloud_base_url(cloud_id);
    }
    match &self.host {
      Some(host) => ensure_url_scheme(host),
      None => Err(anyhow::anyhow!(
        "Jira host not configured. Set ${ENV_JIRA_HOST} or pass --jira-host."
      )),
    }
  }

  /// Basic credentials from the environment, when both halves are present.
  pub fn basic_credentials(&self) -> Option<Credentials> {
    match (&self.username, &self.api_token) {
      (Some(username), Some(password)) => Some(Credentials {
        username: username.clone(),
        password: password.clone(),
      }),
      _ => None,
    }
  }
}

fn read_env(name: &str) -> Option<String> {
  non_blank(std::env::var(name).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
