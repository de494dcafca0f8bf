//! Tool Registry
//!
//! Holds the registered tools and is the single boundary where tool
//! outcomes are turned into [`ToolResponse`] mappings:
//! - every error category (including panics and deadline expiry) becomes
//!   an `{"error": ...}` mapping
//! - an optional per-call deadline bounds hung backend calls
//! - usage counters for diagnostics

use anyhow::{bail, Result};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ToolError;
use crate::response::ToolResponse;
use crate::tool::{BoxedTool, SecurityLevel};

/// Tool definition metadata (without the actual tool implementation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub security_level: SecurityLevel,
}

impl ToolDefinition {
    pub fn is_read_only(&self) -> bool {
        self.security_level == SecurityLevel::ReadOnly
    }
}

/// A registered tool with usage tracking
struct RegisteredTool {
    tool: BoxedTool,
    definition: ToolDefinition,
    use_count: AtomicU64,
}

/// Registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Deadline for a single tool call; None waits indefinitely
    pub call_timeout: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_registered: usize,
    pub total_calls: u64,
    pub failed_calls: u64,
    pub timeouts: u64,
}

/// Tool Registry
pub struct ToolRegistry {
    tools: RwLock<HashMap<Arc<str>, Arc<RegisteredTool>>>,
    config: RegistryConfig,
    stats: RwLock<RegistryStats>,
}

impl ToolRegistry {
    /// Create a new registry with default config
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom config
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            config,
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// Register a tool instance; names must be unique
    pub async fn register_tool(&self, tool: BoxedTool) -> Result<()> {
        let definition = ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
            category: tool.category().to_string(),
            tags: tool.tags(),
            security_level: tool.security_level(),
        };
        let name: Arc<str> = Arc::from(tool.name());

        {
            let mut tools = self.tools.write().await;
            if tools.contains_key(&name) {
                bail!("Tool already registered: {}", name);
            }
            tools.insert(
                name.clone(),
                Arc::new(RegisteredTool {
                    tool,
                    definition,
                    use_count: AtomicU64::new(0),
                }),
            );
        }

        self.stats.write().await.total_registered += 1;
        debug!("Registered tool: {}", name);
        Ok(())
    }

    /// Get a tool by name
    pub async fn get(&self, name: &str) -> Option<BoxedTool> {
        let tools = self.tools.read().await;
        tools.get(name).map(|registered| registered.tool.clone())
    }

    /// Get tool definition
    pub async fn get_definition(&self, name: &str) -> Option<ToolDefinition> {
        let tools = self.tools.read().await;
        tools.get(name).map(|registered| registered.definition.clone())
    }

    /// List all registered tool definitions, ordered by name
    pub async fn list(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut definitions: Vec<_> = tools.values().map(|t| t.definition.clone()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Get registry statistics
    pub async fn stats(&self) -> RegistryStats {
        self.stats.read().await.clone()
    }

    /// How many times a tool has been invoked
    pub async fn call_count(&self, name: &str) -> u64 {
        let tools = self.tools.read().await;
        tools
            .get(name)
            .map(|t| t.use_count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Run a tool and map the outcome to a response mapping.
    ///
    /// Never fails: unknown tools, argument errors, backend faults, panics
    /// and deadline expiry all come back as `ToolResponse::Failure`.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResponse {
        let registered = {
            let tools = self.tools.read().await;
            tools.get(name).cloned()
        };

        let Some(registered) = registered else {
            warn!(tool = %name, "Unknown tool requested");
            self.record(false, false).await;
            return ToolResponse::failure(ToolError::NotFound(name.to_string()).to_string());
        };

        registered.use_count.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();

        let call = AssertUnwindSafe(registered.tool.execute(arguments)).catch_unwind();
        let outcome = match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Ok(Err(ToolError::Timeout {
                    tool: name.to_string(),
                    after: limit,
                })),
            },
            None => call.await,
        };

        let result = outcome.unwrap_or_else(|panic| {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "tool panicked".to_string());
            Err(ToolError::Unexpected(reason))
        });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(output) => {
                info!(tool = %name, elapsed_ms, status = %output.status, "Tool call succeeded");
                self.record(true, false).await;
            }
            Err(e) => {
                warn!(tool = %name, elapsed_ms, kind = e.kind(), error = %e, "Tool call failed");
                self.record(false, matches!(e, ToolError::Timeout { .. })).await;
            }
        }

        result.into()
    }

    async fn record(&self, ok: bool, timed_out: bool) {
        let mut stats = self.stats.write().await;
        stats.total_calls += 1;
        if !ok {
            stats.failed_calls += 1;
        }
        if timed_out {
            stats.timeouts += 1;
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
