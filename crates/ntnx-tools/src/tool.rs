//! Core Tool trait and types
//!
//! Defines the interface every Prism Central tool implements.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ToolError;
use crate::response::ToolOutput;

/// Security level for tool operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Safe read-only operations
    #[default]
    ReadOnly,
    /// Operations that create or change backend state
    Modify,
}

/// Core trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (unique identifier)
    fn name(&self) -> &str;

    /// Get human-readable description
    fn description(&self) -> &str;

    /// Get JSON schema for input validation
    fn input_schema(&self) -> Value;

    /// Execute the tool with given input
    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError>;

    /// Get the security level for this tool
    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::ReadOnly
    }

    /// Get the category this tool belongs to
    fn category(&self) -> &str {
        "general"
    }

    /// Get tags for tool discovery
    fn tags(&self) -> Vec<String> {
        vec![]
    }
}

/// Type alias for boxed tools
pub type BoxedTool = Arc<dyn Tool>;

/// Deserialize tool arguments into their typed form.
///
/// `null` (no arguments at all) is treated as an empty object so tools whose
/// arguments are all optional accept a bare call.
pub fn parse_args<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    let input = match input {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(input).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Simple closure-backed tool, handy for tests and ad-hoc registration
#[derive(Clone)]
pub struct SimpleTool {
    name: String,
    description: String,
    schema: Value,
    handler: Arc<dyn Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync>,
}

impl SimpleTool {
    pub fn new<F>(name: &str, description: &str, schema: Value, handler: F) -> Self
    where
        F: Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema,
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl Tool for SimpleTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        (self.handler)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Args {
        name: String,
        #[serde(default)]
        count: Option<u32>,
    }

    #[tokio::test]
    async fn test_simple_tool() {
        let tool = SimpleTool::new(
            "echo",
            "Echo input back",
            json!({"type": "object"}),
            |input| Ok(ToolOutput::new("ok").with("echo", input)),
        );

        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.security_level(), SecurityLevel::ReadOnly);

        let result = tool.execute(json!({"msg": "hello"})).await.unwrap();
        assert_eq!(result.get("echo"), Some(&json!({"msg": "hello"})));
    }

    #[test]
    fn test_parse_args() {
        let args: Args = parse_args(json!({"name": "vm-1", "count": 2})).unwrap();
        assert_eq!(args.name, "vm-1");
        assert_eq!(args.count, Some(2));

        let err = parse_args::<Args>(json!({"count": 2})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("missing field `name`"));

        let err = parse_args::<Args>(json!({"name": "vm", "count": -1})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_parse_args_null_is_empty_object() {
        #[derive(Deserialize)]
        struct NoArgs {}
        assert!(parse_args::<NoArgs>(Value::Null).is_ok());
    }
}
