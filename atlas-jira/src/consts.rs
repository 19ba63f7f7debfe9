//! Constants for the atlas-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("atlas/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the Jira API
pub const ACCEPT: &str = "application/json";

/// Path segments of the REST API version every endpoint lives under.
pub const API_PREFIX: [&str; 3] = ["rest", "api", "2"];
