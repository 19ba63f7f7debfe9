//! Constants shared by the tool catalogue, validator and normalizer.

/// Fields returned when the caller does not name any.
pub const DEFAULT_FIELDS: &str = "summary,description,status,assignee,reporter,labels,priority,created,updated,issuetype";

/// Upper bound on issues returned by one search call.
pub const PAGE_CAP: u32 = 50;

/// Search page size when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Comments attached to an issue when the caller does not pass `comment_limit`.
pub const DEFAULT_COMMENT_LIMIT: u32 = 10;

/// Field selection value meaning "every field".
pub const ALL_FIELDS: &str = "*all";

/// Prefix of the message every failed invocation surfaces to the caller.
pub const UNIFORM_ERROR_PREFIX: &str = "Caught Exception. Error: ";
