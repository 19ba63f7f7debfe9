//! # Atlas Core Library
//!
//! Configuration and credential plumbing shared by the Jira client and the
//! MCP server: base URL resolution, `.netrc` lookup, and the names of the
//! environment variables the tooling understands.

pub mod config;
pub mod consts;
pub mod creds;
pub mod url;

pub use config::JiraSettings;
pub use creds::Credentials;
