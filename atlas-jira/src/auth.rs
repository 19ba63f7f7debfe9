//! Authentication helpers for the Jira client.
//!
//! These helpers centralize credential lookup so the MCP server builds its
//! client the same way regardless of where the credentials live. Precedence:
//! bearer token, then Basic credentials from the environment, then `.netrc`.

use std::path::Path;

use anyhow::{Context, Result};
use atlas_core::JiraSettings;
use atlas_core::consts::{ENV_JIRA_ACCESS_TOKEN, ENV_JIRA_API_TOKEN, ENV_JIRA_USERNAME, FALLBACK_NETRC_MACHINE};
use atlas_core::creds::Credentials;
use atlas_core::creds::netrc::{get_netrc_path, normalize_host, parse_netrc_file};
use tracing::debug;

use crate::{JiraAuth, JiraClient, create_jira_client};

/// Retrieve Jira credentials from `.netrc`, trying the host first and then
/// the `atlassian.net` catch-all entry.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Credentials> {
  let normalized_host = netrc_machine(jira_host);
  let netrc_path = get_netrc_path(home);

  if netrc_path.exists() {
    for machine in [normalized_host.as_str(), FALLBACK_NETRC_MACHINE] {
      if let Some(creds) = parse_netrc_file(&netrc_path, machine)? {
        debug!(machine, "Using Jira credentials from .netrc");
        return Ok(creds);
      }
    }
  }

  Err(anyhow::anyhow!(
    "Jira credentials not found. Set ${ENV_JIRA_ACCESS_TOKEN}, set ${ENV_JIRA_USERNAME} and ${ENV_JIRA_API_TOKEN}, \
     or add a .netrc entry for machine '{normalized_host}' or '{FALLBACK_NETRC_MACHINE}'."
  ))
}

/// Decide how requests to `base_url` are authenticated.
pub fn resolve_jira_auth(settings: &JiraSettings, home: &Path, base_url: &str) -> Result<JiraAuth> {
  if let Some(token) = &settings.access_token {
    debug!("Using bearer token authentication");
    return Ok(JiraAuth::Bearer { token: token.clone() });
  }

  let credentials = match settings.basic_credentials() {
    Some(creds) => creds,
    None => {
      let host = settings.host.as_deref().unwrap_or(base_url);
      get_jira_credentials(home, host)?
    }
  };

  Ok(JiraAuth::Basic {
    username: credentials.username,
    api_token: credentials.password,
  })
}

/// Creates an authenticated Jira client from resolved settings.
pub fn create_jira_client_from_settings(settings: &JiraSettings, home: &Path) -> Result<JiraClient> {
  let base_url = settings.base_url().context("Failed to resolve Jira base URL")?;
  let auth = resolve_jira_auth(settings, home, &base_url)?;
  Ok(create_jira_client(&base_url, auth))
}

/// The `.netrc` machine name for a host or URL: scheme and path removed.
fn netrc_machine(host: &str) -> String {
  let normalized = normalize_host(host.trim());
  match normalized.split_once('/') {
    Some((machine, _)) => machine.to_string(),
    None => normalized,
  }
}

#[cfg(test)]
mod tests {
  use atlas_test_utils::NetrcGuard;

  use super::*;

  const NETRC: &str = r#"machine custom-jira-host.com
  login custom@example.com
  password custom-token

machine atlassian.com
  login test@example.com
  password test-token

machine atlassian.net
  login net@example.com
  password net-token
"#;

  #[test]
  fn test_get_jira_credentials() {
    let guard = NetrcGuard::new(NETRC);

    let jira_creds = get_jira_credentials(guard.home_dir(), "https://custom-jira-host.com/").unwrap();
    assert_eq!(jira_creds.username, "custom@example.com");
    assert_eq!(jira_creds.password, "custom-token");

    let jira_creds = get_jira_credentials(guard.home_dir(), "nonexistent-host.com").unwrap();
    assert_eq!(jira_creds.username, "net@example.com");
    assert_eq!(jira_creds.password, "net-token");
  }

  #[test]
  fn test_get_jira_credentials_error_messages() {
    let guard = NetrcGuard::without_netrc();

    let error = get_jira_credentials(guard.home_dir(), "custom-jira-host.com")
      .unwrap_err()
      .to_string();
    assert!(error.contains("custom-jira-host.com"));
    assert!(error.contains("atlassian.net"));
    assert!(error.contains(ENV_JIRA_ACCESS_TOKEN));
  }

  #[test]
  fn test_bearer_token_wins() {
    let guard = NetrcGuard::new(NETRC);
    let settings = JiraSettings {
      host: Some("custom-jira-host.com".into()),
      access_token: Some("oauth-token".into()),
      username: Some("env-user".into()),
      api_token: Some("env-token".into()),
      ..Default::default()
    };

    let auth = resolve_jira_auth(&settings, guard.home_dir(), "https://custom-jira-host.com").unwrap();
    assert!(matches!(auth, JiraAuth::Bearer { ref token } if token == "oauth-token"));
  }

  #[test]
  fn test_environment_credentials_beat_netrc() {
    let guard = NetrcGuard::new(NETRC);
    let settings = JiraSettings {
      host: Some("custom-jira-host.com".into()),
      username: Some("env-user".into()),
      api_token: Some("env-token".into()),
      ..Default::default()
    };

    let auth = resolve_jira_auth(&settings, guard.home_dir(), "https://custom-jira-host.com").unwrap();
    match auth {
      JiraAuth::Basic { username, api_token } => {
        assert_eq!(username, "env-user");
        assert_eq!(api_token, "env-token");
      }
      other => panic!("expected basic auth, got {other:?}"),
    }
  }

  #[test]
  fn test_netrc_fallback_uses_base_url_host() {
    let guard = NetrcGuard::new(NETRC);
    let settings = JiraSettings::default();

    let auth = resolve_jira_auth(&settings, guard.home_dir(), "https://custom-jira-host.com/jira").unwrap();
    assert!(matches!(auth, JiraAuth::Basic { ref username, .. } if username == "custom@example.com"));
  }

  #[test]
  fn test_create_client_from_settings() {
    let guard = NetrcGuard::new(NETRC);
    let settings = JiraSettings {
      host: Some("custom-jira-host.com".into()),
      ..Default::default()
    };

    let client = create_jira_client_from_settings(&settings, guard.home_dir()).unwrap();
    assert_eq!(client.base_url(), "https://custom-jira-host.com");
  }

  #[test]
  fn test_create_client_without_host_fails() {
    let guard = NetrcGuard::new(NETRC);
    let error = create_jira_client_from_settings(&JiraSettings::default(), guard.home_dir())
      .err()
      .map(|e| format!("{e:#}"))
      .unwrap();
    assert!(error.contains("Failed to resolve Jira base URL"));
  }
}
