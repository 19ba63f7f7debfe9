//! # Atlas MCP Server
//!
//! Model Context Protocol server exposing Jira issue lookup and JQL search
//! as LLM-callable tools.
//!
//! A call flows through the [`ToolDispatcher`]: the tool is resolved in the
//! [`ToolCatalogue`], its arguments are validated and bounded, the
//! [`Gateway`] fetches the upstream payload, and the normalizer reduces it
//! to compact JSON. Every failure along the way surfaces as the same
//! `Caught Exception. Error: <message>` text.

pub mod catalogue;
pub mod consts;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod server;
pub mod types;
pub mod validate;

pub use catalogue::ToolCatalogue;
pub use context::JiraGateway;
pub use dispatch::ToolDispatcher;
pub use error::{DispatchError, DispatchErrorKind, GatewayError};
pub use gateway::Gateway;
pub use server::AtlasMcpServer;
