//! Uniform tool result shape
//!
//! A tool either succeeds with `{"status": ..., <payload keys>}` or fails
//! with `{"error": ...}`. Nothing else crosses the tool boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Successful tool outcome: a status line plus optional payload keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub status: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ToolOutput {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            fields: Map::new(),
        }
    }

    /// Attach a payload key
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Discriminated result of one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResponse {
    Success(ToolOutput),
    Failure { error: String },
}

impl ToolResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        ToolResponse::Failure {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolResponse::Failure { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ToolResponse::Failure { error } => Some(error),
            ToolResponse::Success(_) => None,
        }
    }

    pub fn output(&self) -> Option<&ToolOutput> {
        match self {
            ToolResponse::Success(output) => Some(output),
            ToolResponse::Failure { .. } => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ToolResponse::Success(output) => {
                let mut map = output.fields.clone();
                map.insert("status".to_string(), Value::String(output.status.clone()));
                Value::Object(map)
            }
            ToolResponse::Failure { error } => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(error.clone()));
                Value::Object(map)
            }
        }
    }
}

impl From<Result<ToolOutput, ToolError>> for ToolResponse {
    fn from(result: Result<ToolOutput, ToolError>) -> Self {
        match result {
            Ok(output) => ToolResponse::Success(output),
            Err(e) => ToolResponse::failure(e.to_string()),
        }
    }
}
