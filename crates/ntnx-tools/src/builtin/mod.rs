//! Built-in Tools
//!
//! Every tool proxies exactly one Prism Central operation:
//!
//! - **Images**: `list_images`, `create_image` (vmm)
//! - **VMs**: `create_vm` (vmm)
//! - **Logs**: `get_logs` (monitoring)
//! - **Alerts**: `get_alerts` (monitoring)
//! - **Tasks**: `get_task` (prism)
//!
//! Tools share a read-only [`PrismConfig`] and build a fresh client per call.

mod alerts;
mod images;
mod logs;
mod tasks;
mod vms;

pub use alerts::GetAlertsTool;
pub use images::{summarize_images, CreateImageTool, ImageSummary, ListImagesTool, SkippedRecord};
pub use logs::{GetLogsTool, ARCHIVE_NAME};
pub use tasks::{task_summary, GetTaskTool};
pub use vms::{memory_bytes, CreateVmTool, MIN_MEMORY_GB};

use anyhow::Result;
use ntnx_core::PrismConfig;
use std::sync::Arc;
use tracing::info;

use crate::registry::ToolRegistry;
use crate::tool::BoxedTool;

/// Create all Prism Central tools as a vector
pub fn create_prism_tools(config: Arc<PrismConfig>) -> Vec<BoxedTool> {
    vec![
        Arc::new(ListImagesTool::new(config.clone())),
        Arc::new(CreateImageTool::new(config.clone())),
        Arc::new(CreateVmTool::new(config.clone())),
        Arc::new(GetLogsTool::new(config.clone())),
        Arc::new(GetAlertsTool::new(config.clone())),
        Arc::new(GetTaskTool::new(config)),
    ]
}

/// Register all Prism Central tools with the registry
pub async fn register_prism_tools(registry: &ToolRegistry, config: Arc<PrismConfig>) -> Result<()> {
    let tools = create_prism_tools(config);
    let count = tools.len();
    for tool in tools {
        registry.register_tool(tool).await?;
    }
    info!(count, "Registered Prism Central tools");
    Ok(())
}
