//! Protocol dispatch for the MCP server.
//!
//! One method handler per protocol method; tool execution errors surface
//! as error results inside a successful response, never as JSON-RPC errors.

use serde_json::{json, Value};

use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use crate::widgets;

pub const SERVER_NAME: &str = "taskdeck-mcp";

/// JSON-RPC dispatcher over the tool registry and widget catalog.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Handle one request. Notifications return `None`.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        match request.method.as_str() {
            "initialize" => Some(JsonRpcResponse::success(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "capabilities": {
                        "tools": { "listChanged": false },
                        "resources": { "listChanged": false }
                    }
                }),
            )),
            "notifications/initialized" | "initialized" => None,
            "tools/list" => Some(JsonRpcResponse::success(
                request.id,
                json!({ "tools": self.registry.definitions() }),
            )),
            "tools/call" => {
                let name = request
                    .params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let args = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                tracing::debug!(tool = name, "tools/call");
                let result = self.registry.execute(name, args).await;
                Some(JsonRpcResponse::success(request.id, json!(result)))
            }
            "resources/list" => Some(JsonRpcResponse::success(
                request.id,
                json!({ "resources": widgets::descriptors() }),
            )),
            "resources/read" => {
                let uri = request
                    .params
                    .get("uri")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                match widgets::read(uri) {
                    Some(contents) => Some(JsonRpcResponse::success(
                        request.id,
                        json!({ "contents": [contents] }),
                    )),
                    None => Some(JsonRpcResponse::error(
                        request.id,
                        INVALID_PARAMS,
                        format!("Unknown resource: {}", uri),
                    )),
                }
            }
            other => Some(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }
}
