//! MCP protocol surface: tool listing and tool calls over rmcp.

use std::sync::Arc;

use rmcp::model::{
  CallToolRequestParam, CallToolResult, Content, JsonObject, ListToolsResult, PaginatedRequestParam,
  ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value;
use tracing::error;

use crate::dispatch::ToolDispatcher;
use crate::gateway::Gateway;

pub struct AtlasMcpServer<G> {
  dispatcher: Arc<ToolDispatcher<G>>,
}

impl<G> Clone for AtlasMcpServer<G> {
  fn clone(&self) -> Self {
    Self {
      dispatcher: Arc::clone(&self.dispatcher),
    }
  }
}

impl<G: Gateway + 'static> AtlasMcpServer<G> {
  pub fn new(dispatcher: ToolDispatcher<G>) -> Self {
    Self {
      dispatcher: Arc::new(dispatcher),
    }
  }

  /// The catalogue as MCP tool descriptors.
  pub fn tools(&self) -> Vec<Tool> {
    self
      .dispatcher
      .catalogue()
      .list()
      .iter()
      .map(|definition| definition.to_mcp_tool())
      .collect()
  }

  /// Run a tool call. Failures are reported in-band as an error result
  /// carrying the uniform message, never as a protocol error.
  pub async fn handle_call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
    let arguments = arguments.map(Value::Object);
    match Arc::clone(&self.dispatcher)
      .invoke_isolated(name.to_string(), arguments)
      .await
    {
      Ok(text) => CallToolResult::success(vec![Content::text(text)]),
      Err(err) => {
        error!(tool = name, kind = ?err.kind(), "Tool call failed: {err}");
        CallToolResult::error(vec![Content::text(err.uniform_message())])
      }
    }
  }
}

impl<G: Gateway + 'static> ServerHandler for AtlasMcpServer<G> {
  fn get_info(&self) -> ServerInfo {
    ServerInfo {
      instructions: Some(
        "Atlas MCP server. Provides read-only access to Jira: fetch an issue by key \
         or search issues with JQL."
          .into(),
      ),
      capabilities: ServerCapabilities::builder().enable_tools().build(),
      ..Default::default()
    }
  }

  async fn list_tools(
    &self,
    _request: Option<PaginatedRequestParam>,
    _context: RequestContext<RoleServer>,
  ) -> Result<ListToolsResult, McpError> {
    Ok(ListToolsResult {
      tools: self.tools(),
      ..Default::default()
    })
  }

  async fn call_tool(
    &self,
    request: CallToolRequestParam,
    _context: RequestContext<RoleServer>,
  ) -> Result<CallToolResult, McpError> {
    Ok(self.handle_call(&request.name, request.arguments).await)
  }
}
