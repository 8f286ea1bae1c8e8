use anyhow::{Context, Result};

use super::client;
use crate::core::AppConfig;
use crate::mcp::McpServer;

pub async fn run(config: &AppConfig, api_key: Option<&str>) -> Result<()> {
    // No key means nothing the server could do would work
    let client = client(config, api_key)
        .await
        .context("Failed to start MCP server")?;
    McpServer::new(client).serve_stdio().await
}
