//! ntnx-mcp: MCP Protocol Adapter for Prism Central
//!
//! Exposes the Prism Central tools from `ntnx-tools` via the Model Context
//! Protocol.
//!
//! Architecture:
//! stdin → MCP JSON-RPC → McpServer → ToolRegistry → Prism Central → stdout
//!
//! Methods:
//! - initialize → handshake
//! - notifications/initialized → no reply
//! - ping → empty result
//! - tools/list → registered tool definitions
//! - tools/call → registry invoke, result mapping as text + structured content

pub mod config;
pub mod protocol;
pub mod server;
pub mod transport;

pub use config::{ServerSettings, Settings};
pub use protocol::{JsonRpcError, McpRequest, McpResponse};
pub use server::{McpServer, McpServerConfig, RegistryExecutor, ToolExecutor, ToolInfo};

/// MCP protocol revision implemented by the server
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "ntnx-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
