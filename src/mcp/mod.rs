//! Model Context Protocol server for the Buttondown tools.
//!
//! Framing, the initialize handshake and the stdio transport come from
//! `rmcp`. This module only advertises the tools and maps their results.
//! Logging must never go to stdout since it carries the protocol.

pub mod tools;

use anyhow::Result;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;

use crate::buttondown::ButtondownClient;
use tools::{BoxedToolCall, ToolError};

pub const SERVER_NAME: &str = "buttondown";

pub struct McpServer {
    tools: Vec<BoxedToolCall>,
}

impl McpServer {
    pub fn new(client: ButtondownClient) -> Self {
        Self {
            tools: tools::all(client),
        }
    }

    /// Tool definitions in the order they are registered.
    pub fn tool_definitions(&self) -> Result<Vec<Tool>, ErrorData> {
        self.tools
            .iter()
            .map(|tool| {
                tools::to_mcp_tool(tool).map_err(|e| {
                    ErrorData::internal_error(format!("Invalid tool definition: {}", e), None)
                })
            })
            .collect()
    }

    /// Run a tool by name. Unknown tools and bad arguments are protocol
    /// errors; anything that goes wrong talking to Buttondown is reported
    /// as a tool result with `isError` set so the session carries on.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(tool) = self.tools.iter().find(|t| t.function_name() == name) else {
            return Err(ErrorData::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            ));
        };

        let args = Value::Object(arguments.unwrap_or_default());

        tracing::info!("Calling tool {}", name);
        match tool.call(args).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(ToolError::InvalidArguments(msg)) => Err(ErrorData::invalid_params(
                format!("Invalid arguments: {}", msg),
                None,
            )),
            Err(e) => {
                tracing::error!("Tool {} failed: {}", name, e);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }

    /// Serve on stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        tracing::info!("Buttondown MCP server listening on stdio");
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .inspect_err(|e| tracing::error!("MCP serve error: {:?}", e))?;

        let reason = service.waiting().await?;
        tracing::info!("MCP server stopped: {:?}", reason);
        Ok(())
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(String::from(
                "Manage Buttondown newsletter drafts. create_draft and schedule_draft \
                 return a preview until called again with \"confirmed\": true.",
            )),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_definitions()?))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments).await
    }
}
