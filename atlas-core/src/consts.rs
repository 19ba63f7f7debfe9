//! Core constants shared across atlas components.

/// Environment variable for the Jira host URL.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Environment variable for the Atlassian Cloud id. When set, requests are
/// routed through the Atlassian API gateway instead of the site host.
pub const ENV_JIRA_CLOUD_ID: &str = "JIRA_CLOUD_ID";

/// Environment variable holding an OAuth or personal access token.
pub const ENV_JIRA_ACCESS_TOKEN: &str = "JIRA_ACCESS_TOKEN";

/// Environment variable holding the Basic auth username.
pub const ENV_JIRA_USERNAME: &str = "JIRA_USERNAME";

/// Environment variable holding the Basic auth API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Base of the Atlassian API gateway used with a Cloud id.
pub const CLOUD_API_BASE_URL: &str = "https://api.atlassian.com/ex/jira";

/// Machine name consulted in `.netrc` when the exact host has no entry.
pub const FALLBACK_NETRC_MACHINE: &str = "atlassian.net";
