//! Transport Layer
//!
//! Only stdio is provided; the [`Transport`] seam keeps the server itself
//! transport-agnostic.

mod stdio;

pub use stdio::{serve_io, StdioTransport};

use anyhow::Result;
use std::sync::Arc;

/// Generic MCP server trait for transport layer
#[async_trait::async_trait]
pub trait McpHandler: Send + Sync {
    /// Handle one request; `None` for notifications
    async fn handle_request(&self, request: crate::McpRequest) -> Option<crate::McpResponse>;
}

/// Transport trait - implement for new transport types
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Serve requests using this transport
    async fn serve<H: McpHandler + 'static>(self, handler: Arc<H>) -> Result<()>;
}

#[async_trait::async_trait]
impl McpHandler for crate::McpServer {
    async fn handle_request(&self, request: crate::McpRequest) -> Option<crate::McpResponse> {
        self.handle_request(request).await
    }
}
