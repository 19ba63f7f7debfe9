//! The seam between tool dispatch and the Jira backend.

use std::future::Future;

use serde_json::Value;

use crate::error::GatewayError;
use crate::types::{IssueRequest, SearchRequest};

/// Access to upstream Jira data.
///
/// Implementations return the upstream payload untouched; reducing it to the
/// canonical shape is the normalizer's job. The dispatcher holds a reference
/// to one Gateway, so tests can swap in a fake without any network.
pub trait Gateway: Send + Sync {
  /// Fetch a single issue by key.
  fn fetch_issue(&self, request: &IssueRequest) -> impl Future<Output = Result<Value, GatewayError>> + Send;

  /// Run a JQL search and return one page of results.
  fn search(&self, request: &SearchRequest) -> impl Future<Output = Result<Value, GatewayError>> + Send;
}
