//! # Jira API Client
//!
//! Read-only Jira REST integration: fetching a single issue and running JQL
//! searches. Responses are returned as raw JSON so that callers decide how
//! much of Jira's deeply nested issue shape they keep.

mod auth;
mod client;
mod consts;
mod endpoints;
pub mod models;

pub use auth::{create_jira_client_from_settings, get_jira_credentials, resolve_jira_auth};
// Re-export the client
pub use client::{JiraClient, create_jira_client};
// Re-export models
pub use models::{IssueQuery, JiraAuth, SearchQuery};
