//! # Credential Management
//!
//! Retrieval of Basic authentication credentials for Jira. Credentials come
//! from the environment (see [`crate::config::JiraSettings`]) or from the
//! user's `.netrc`.

pub mod netrc;

/// Represents credentials for a service
#[derive(Debug, Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}
