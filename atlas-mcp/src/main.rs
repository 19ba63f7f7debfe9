//! atlas-mcp: MCP server exposing Jira issues and JQL search over stdio.

use anyhow::{Context, Result};
use atlas_core::JiraSettings;
use atlas_mcp::{AtlasMcpServer, JiraGateway, ToolCatalogue, ToolDispatcher};
use clap::{ArgAction, Parser};
use directories::BaseDirs;
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "MCP server for Jira issue lookup and JQL search")]
struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  verbose: u8,

  /// Jira host, overriding $JIRA_HOST
  #[arg(long = "jira-host", value_name = "URL")]
  jira_host: Option<String>,

  /// Atlassian Cloud id, overriding $JIRA_CLOUD_ID
  #[arg(long = "cloud-id", value_name = "ID")]
  cloud_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // stdout carries the JSON-RPC stream, so logs go to stderr.
  let level = match cli.verbose {
    0 => tracing::Level::WARN,
    1 => tracing::Level::INFO,
    2 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };

  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  let settings = JiraSettings::from_env()
    .with_host(cli.jira_host)
    .with_cloud_id(cli.cloud_id);
  let home_dir = BaseDirs::new()
    .context("Failed to determine home directory")?
    .home_dir()
    .to_path_buf();

  let gateway = JiraGateway::new(settings, home_dir);
  let server = AtlasMcpServer::new(ToolDispatcher::new(ToolCatalogue::new(), gateway));

  info!("Starting atlas-mcp on stdio");
  let service = server.serve(rmcp::transport::io::stdio()).await?;
  service.waiting().await?;

  Ok(())
}
