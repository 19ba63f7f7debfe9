//! Tool dispatch: lookup, validation, Gateway call, normalization and
//! serialization, with every failure folded into one [`DispatchError`].

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalogue::{ToolCatalogue, ToolKind};
use crate::error::{DispatchError, ValidationError};
use crate::gateway::Gateway;
use crate::normalize::{normalize_issue, normalize_search, render};
use crate::types::{IssueRequest, Normalized, SearchRequest, SearchResult};
use crate::validate::{ValidatedArguments, validate};

/// Routes tool calls to the Gateway.
///
/// The catalogue is fixed at construction and shared read-only, so one
/// dispatcher can serve concurrent calls.
pub struct ToolDispatcher<G> {
  catalogue: ToolCatalogue,
  gateway: G,
}

impl<G: Gateway> ToolDispatcher<G> {
  pub fn new(catalogue: ToolCatalogue, gateway: G) -> Self {
    Self { catalogue, gateway }
  }

  pub fn catalogue(&self) -> &ToolCatalogue {
    &self.catalogue
  }

  pub fn gateway(&self) -> &G {
    &self.gateway
  }

  /// Run one tool call and return the pretty-printed JSON result.
  ///
  /// Validation happens before the Gateway is touched, so an unknown tool or
  /// malformed arguments never cause an upstream request.
  pub async fn invoke(&self, name: &str, arguments: Option<&Value>) -> Result<String, DispatchError> {
    let definition = self.catalogue.resolve(name)?;
    let args = validate(definition, arguments)?;

    match definition.kind {
      ToolKind::GetIssue => {
        let request = issue_request(&args)?;
        debug!(issue_key = %request.key, "Fetching issue");
        let upstream = self.gateway.fetch_issue(&request).await?;
        let normalized = normalize_issue(upstream, &request.selection())?;
        if normalized.is_raw() {
          warn!(issue_key = %request.key, "Upstream issue has an unexpected shape, returning it unchanged");
        }
        Ok(render(&normalized)?)
      }
      ToolKind::Search => {
        let request = search_request(&args)?;
        debug!(
          jql = %request.jql,
          limit = request.limit,
          start_at = request.start_at,
          "Searching with JQL"
        );
        let upstream = self.gateway.search(&request).await?;
        let normalized = normalize_search(upstream, &request.selection())?;
        report_search_passthrough(&normalized, &request.jql);
        Ok(render(&normalized)?)
      }
    }
  }
}

impl<G: Gateway + 'static> ToolDispatcher<G> {
  /// Like [`invoke`](Self::invoke), but on its own task.
  ///
  /// A panic anywhere in the call becomes an `Internal` error instead of
  /// taking the server down. Dropping the returned future aborts the call.
  pub async fn invoke_isolated(
    self: Arc<Self>,
    name: String,
    arguments: Option<Value>,
  ) -> Result<String, DispatchError> {
    let task = AbortOnDrop(tokio::spawn(async move { self.invoke(&name, arguments.as_ref()).await }));
    match task.join().await {
      Ok(result) => result,
      Err(err) if err.is_panic() => Err(DispatchError::internal(panic_message(err.into_panic()))),
      Err(err) => Err(DispatchError::internal(format!("tool call was cancelled: {err}"))),
    }
  }
}

/// One warning per search whose page, or any issue on it, was passed
/// through unchanged.
fn report_search_passthrough(page: &Normalized<SearchResult>, jql: &str) {
  match page {
    Normalized::Raw(_) => warn!(jql, "Upstream search result has no issues list, returning it unchanged"),
    Normalized::Record(result) => {
      let raw = result.issues.iter().filter(|issue| issue.is_raw()).count();
      if raw > 0 {
        warn!(jql, raw, "Upstream search returned issues with an unexpected shape, passing them through");
      }
    }
  }
}

fn issue_request(args: &ValidatedArguments) -> Result<IssueRequest, ValidationError> {
  Ok(IssueRequest {
    key: args.require_string("issue_key")?.to_string(),
    fields: args.require_string("fields")?.to_string(),
    expand: args.string("expand").filter(|expand| !expand.is_empty()).map(str::to_string),
    comment_limit: args
      .integer("comment_limit")
      .map_or(0, |limit| u32::try_from(limit).unwrap_or(u32::MAX)),
  })
}

fn search_request(args: &ValidatedArguments) -> Result<SearchRequest, ValidationError> {
  Ok(SearchRequest {
    jql: args.require_string("jql")?.to_string(),
    fields: args.require_string("fields")?.to_string(),
    limit: args
      .integer("limit")
      .and_then(|limit| u32::try_from(limit).ok())
      .unwrap_or(1),
    start_at: args
      .integer("startAt")
      .map_or(0, |start| u64::try_from(start).unwrap_or(0)),
  })
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> AbortOnDrop<T> {
  async fn join(mut self) -> Result<T, tokio::task::JoinError> {
    (&mut self.0).await
  }
}

impl<T> Drop for AbortOnDrop<T> {
  fn drop(&mut self) {
    self.0.abort();
  }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    format!("internal error: {message}")
  } else if let Some(message) = payload.downcast_ref::<String>() {
    format!("internal error: {message}")
  } else {
    "internal error: tool call panicked".to_string()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use serde_json::json;

  use super::*;
  use crate::error::{DispatchErrorKind, GatewayError};
  use crate::types::FieldSelection;

  #[derive(Default)]
  struct RecordingGateway {
    issue_requests: Mutex<Vec<IssueRequest>>,
    search_requests: Mutex<Vec<SearchRequest>>,
  }

  impl Gateway for RecordingGateway {
    async fn fetch_issue(&self, request: &IssueRequest) -> Result<Value, GatewayError> {
      self.issue_requests.lock().unwrap().push(request.clone());
      if request.key == "GONE-1" {
        return Err(GatewayError::msg("Issue GONE-1 not found"));
      }
      if request.key == "BOOM-1" {
        panic!("gateway exploded");
      }
      Ok(json!({ "key": request.key, "fields": { "summary": "Example" } }))
    }

    async fn search(&self, request: &SearchRequest) -> Result<Value, GatewayError> {
      self.search_requests.lock().unwrap().push(request.clone());
      Ok(json!({ "startAt": request.start_at, "maxResults": request.limit, "total": 0, "issues": [] }))
    }
  }

  fn dispatcher() -> ToolDispatcher<RecordingGateway> {
    ToolDispatcher::new(ToolCatalogue::new(), RecordingGateway::default())
  }

  #[tokio::test]
  async fn test_issue_request_built_from_arguments() {
    let dispatcher = dispatcher();
    let output = dispatcher
      .invoke(
        "get_issue",
        Some(&json!({ "issue_key": "PROJ-1", "fields": "summary", "expand": "", "comment_limit": "3" })),
      )
      .await
      .unwrap();

    let requests = dispatcher.gateway().issue_requests.lock().unwrap().clone();
    assert_eq!(
      requests,
      vec![IssueRequest {
        key: "PROJ-1".into(),
        fields: "summary".into(),
        expand: None,
        comment_limit: 3,
      }]
    );
    assert_eq!(output, "{\n  \"key\": \"PROJ-1\",\n  \"summary\": \"Example\"\n}");
  }

  #[tokio::test]
  async fn test_search_request_clamped() {
    let dispatcher = dispatcher();
    dispatcher
      .invoke("search", Some(&json!({ "jql": "project = PROJ", "limit": 80, "startAt": 120 })))
      .await
      .unwrap();

    let requests = dispatcher.gateway().search_requests.lock().unwrap().clone();
    assert_eq!(requests[0].limit, 50);
    assert_eq!(requests[0].start_at, 120);
  }

  #[tokio::test]
  async fn test_gateway_failure_is_upstream_failure() {
    let err = dispatcher()
      .invoke("get_issue", Some(&json!({ "issue_key": "GONE-1" })))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), DispatchErrorKind::UpstreamFailure);
    assert_eq!(err.uniform_message(), "Caught Exception. Error: Issue GONE-1 not found");
  }

  #[tokio::test]
  async fn test_invalid_arguments_never_reach_gateway() {
    let dispatcher = dispatcher();
    let err = dispatcher
      .invoke("get_issue", Some(&json!({ "issue_key": "PROJ-1", "comment_limit": -2 })))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), DispatchErrorKind::InvalidArguments);
    assert!(dispatcher.gateway().issue_requests.lock().unwrap().is_empty());
  }

  #[derive(Clone, Default)]
  struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

  impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  fn warnings_while(run: impl FnOnce()) -> usize {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_ansi(false)
      .with_writer(move || writer.clone())
      .finish();
    tracing::subscriber::with_default(subscriber, run);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    output.lines().filter(|line| line.contains("WARN")).count()
  }

  #[test]
  fn test_raw_search_page_warns_once() {
    let selection = FieldSelection::All;
    let warnings = warnings_while(|| {
      let page = normalize_search(json!({ "total": 1, "values": [] }), &selection).unwrap();
      report_search_passthrough(&page, "project = PROJ");
    });
    assert_eq!(warnings, 1);

    let warnings = warnings_while(|| {
      let upstream = json!({ "issues": [["odd"], "odd", { "key": "PROJ-1", "fields": {} }] });
      let page = normalize_search(upstream, &selection).unwrap();
      report_search_passthrough(&page, "project = PROJ");
    });
    assert_eq!(warnings, 1);

    let warnings = warnings_while(|| {
      let page = normalize_search(json!({ "issues": [] }), &selection).unwrap();
      report_search_passthrough(&page, "project = PROJ");
    });
    assert_eq!(warnings, 0);
  }

  #[tokio::test]
  async fn test_panic_becomes_internal_error() {
    let dispatcher = Arc::new(dispatcher());
    let err = Arc::clone(&dispatcher)
      .invoke_isolated("get_issue".into(), Some(json!({ "issue_key": "BOOM-1" })))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), DispatchErrorKind::Internal);
    assert_eq!(err.uniform_message(), "Caught Exception. Error: internal error: gateway exploded");

    // The dispatcher keeps serving after a panicked call.
    let output = dispatcher
      .invoke_isolated("get_issue".into(), Some(json!({ "issue_key": "PROJ-2" })))
      .await
      .unwrap();
    assert!(output.contains("PROJ-2"));
  }
}
