//! ntnx-tools: Tool Registry and Prism Central Tools
//!
//! Provides the tool registry, the uniform tool result shape, and the
//! built-in tools that proxy Prism Central operations.

pub mod builtin;
pub mod error;
pub mod registry;
pub mod response;
pub mod timefmt;
pub mod tool;

// Re-export main types
pub use builtin::{create_prism_tools, register_prism_tools};
pub use error::ToolError;
pub use registry::{RegistryConfig, RegistryStats, ToolDefinition, ToolRegistry};
pub use response::{ToolOutput, ToolResponse};
pub use tool::{parse_args, BoxedTool, SecurityLevel, Tool};
