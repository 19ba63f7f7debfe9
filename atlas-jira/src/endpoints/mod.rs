//! # Jira API Endpoints
//!
//! Read-only endpoint implementations: single-issue fetch and JQL search.

pub mod issues;
pub mod search;
