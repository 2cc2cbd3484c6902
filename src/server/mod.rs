//! MCP server implementation for the fallback handler.
//!
//! This module provides the MCP protocol server that exposes query
//! classification and fallback contacts to AI assistants through the Model
//! Context Protocol.

pub mod handlers;

pub use handlers::FallbackMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the fallback MCP server with stdio transport.
///
/// This function starts the MCP server and runs it until completion.
/// It communicates via stdin/stdout using the MCP protocol.
pub async fn run_server(server: FallbackMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
