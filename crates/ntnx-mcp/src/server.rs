//! MCP Server
//!
//! Core server implementation that handles all MCP protocol logic.
//! Transport-agnostic: the stdio transport feeds it parsed requests.

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use anyhow::Result;
use ntnx_core::PrismConfig;
use ntnx_tools::{register_prism_tools, RegistryConfig, ToolRegistry, ToolResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct McpServerConfig {
    /// Server name override
    pub name: Option<String>,
}

/// Tool information for MCP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
    /// Discovery metadata: `category` and `tags`
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ToolInfo {
    pub fn category(&self) -> Option<&str> {
        self.meta.as_ref()?.get("category")?.as_str()
    }
}

/// Tool executor trait - implement this to provide tools
#[async_trait::async_trait]
pub trait ToolExecutor: Send + Sync {
    /// List available tools
    async fn list_tools(&self) -> Vec<ToolInfo>;

    /// Execute a tool by name; failures come back as error mappings
    async fn execute_tool(&self, name: &str, arguments: Value) -> ToolResponse;
}

/// Tool executor backed by the ntnx-tools registry
pub struct RegistryExecutor {
    registry: Arc<ToolRegistry>,
}

impl RegistryExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for RegistryExecutor {
    async fn list_tools(&self) -> Vec<ToolInfo> {
        let tools = self.registry.list().await;
        tools
            .into_iter()
            .map(|t| {
                let read_only = t.is_read_only();
                ToolInfo {
                    name: t.name,
                    description: t.description,
                    input_schema: t.input_schema,
                    annotations: Some(json!({
                        "readOnlyHint": read_only,
                        "destructiveHint": false,
                        "idempotentHint": read_only,
                        "openWorldHint": true
                    })),
                    meta: Some(json!({
                        "category": t.category,
                        "tags": t.tags
                    })),
                }
            })
            .collect()
    }

    async fn execute_tool(&self, name: &str, arguments: Value) -> ToolResponse {
        self.registry.invoke(name, arguments).await
    }
}

#[derive(Debug, Clone)]
struct ClientInfo {
    name: String,
    version: Option<String>,
}

/// MCP Server
pub struct McpServer {
    config: McpServerConfig,
    tool_executor: Arc<dyn ToolExecutor>,
    /// Client info from last initialize
    client_info: RwLock<Option<ClientInfo>>,
}

impl McpServer {
    /// Create server with the Prism Central tools registered
    pub async fn new(
        config: McpServerConfig,
        prism: Arc<PrismConfig>,
        registry_config: RegistryConfig,
    ) -> Result<Arc<Self>> {
        let registry = Arc::new(ToolRegistry::with_config(registry_config));
        register_prism_tools(&registry, prism).await?;

        let tool_executor = Arc::new(RegistryExecutor::new(registry));
        Ok(Arc::new(Self::with_executor(config, tool_executor)))
    }

    /// Create server with custom tool executor
    pub fn with_executor(config: McpServerConfig, tool_executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            config,
            tool_executor,
            client_info: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or(SERVER_NAME)
    }

    /// Handle an MCP request; notifications yield no response
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!(method = %request.method, "Handling MCP request");

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "ping" => McpResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request).await,
            "tools/call" => self.handle_tools_call(request).await,
            _ => McpResponse::error(request.id, JsonRpcError::method_not_found(&request.method)),
        };
        Some(response)
    }

    fn handle_notification(&self, request: &McpRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => info!("Client initialized"),
            "notifications/cancelled" => {
                debug!(params = ?request.params, "Client cancelled request")
            }
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    async fn handle_initialize(&self, request: McpRequest) -> McpResponse {
        let client_info = request.param("clientInfo");
        let client_name = client_info
            .and_then(|ci| ci.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");
        let client_version = client_info
            .and_then(|ci| ci.get("version"))
            .and_then(|v| v.as_str());

        *self.client_info.write().await = Some(ClientInfo {
            name: client_name.to_string(),
            version: client_version.map(String::from),
        });

        info!(
            client = %client_name,
            version = %client_version.unwrap_or("?"),
            "Client connected"
        );

        McpResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": self.name(),
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    async fn handle_tools_list(&self, request: McpRequest) -> McpResponse {
        let mut tools = self.tool_executor.list_tools().await;
        if let Some(category) = request.param("category").and_then(|c| c.as_str()) {
            tools.retain(|t| t.category() == Some(category));
        }
        debug!(count = tools.len(), "Listing tools");
        McpResponse::success(request.id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, request: McpRequest) -> McpResponse {
        let Some(params) = request.params.as_ref() else {
            return McpResponse::error(request.id, JsonRpcError::invalid_params("Missing params"));
        };

        let Some(tool_name) = params.get("name").and_then(|n| n.as_str()) else {
            return McpResponse::error(
                request.id,
                JsonRpcError::invalid_params("Missing tool name"),
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        let client = self
            .client_info
            .read()
            .await
            .as_ref()
            .map(|c| format!("{}/{}", c.name, c.version.as_deref().unwrap_or("?")));
        debug!(tool = %tool_name, client = ?client, "Calling tool");

        let response = self.tool_executor.execute_tool(tool_name, arguments).await;
        let mapping = response.to_value();
        let text = serde_json::to_string_pretty(&mapping).unwrap_or_else(|_| mapping.to_string());

        McpResponse::success(
            request.id,
            json!({
                "content": [{
                    "type": "text",
                    "text": text
                }],
                "structuredContent": mapping,
                "isError": response.is_error()
            }),
        )
    }
}
