//! Tool error taxonomy
//!
//! Every variant is turned into an `{"error": ...}` mapping by the registry,
//! so the Display text is exactly what the caller sees.

use ntnx_client::ApiError;
use ntnx_core::ConfigError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    /// Credentials or endpoint missing/invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Caller-supplied value breaks a business rule
    #[error("{0}")]
    Validation(String),

    #[error("Invalid time format: {0}. Use formats like '31 march 12 AM' or '31 march 2025 12:00 AM'")]
    TimeFormat(String),

    /// Arguments did not match the tool's schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The backend call failed; `context` names the operation
    #[error("{context}: {source}")]
    Backend {
        context: &'static str,
        #[source]
        source: ApiError,
    },

    /// The backend answered but without the expected payload
    #[error("{0}")]
    NoData(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Tool '{tool}' timed out after {}s", .after.as_secs())]
    Timeout { tool: String, after: Duration },

    #[error("Tool not found: {0}")]
    NotFound(String),
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ToolError::Validation(msg.into())
    }

    pub fn no_data(msg: impl Into<String>) -> Self {
        ToolError::NoData(msg.into())
    }

    /// Wrap a client failure with the operation that produced it.
    ///
    /// Configuration problems surfaced while building the client keep
    /// their own category.
    pub fn backend(context: &'static str, err: ApiError) -> Self {
        match err {
            ApiError::Config(e) => ToolError::Config(e),
            source => ToolError::Backend { context, source },
        }
    }

    /// Short category name for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Config(_) => "missing_configuration",
            ToolError::Validation(_)
            | ToolError::TimeFormat(_)
            | ToolError::InvalidArguments(_) => "validation",
            ToolError::Backend { .. } => "backend_rejection",
            ToolError::NoData(_) | ToolError::Unexpected(_) => "unexpected",
            ToolError::Timeout { .. } => "timeout",
            ToolError::NotFound(_) => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error(reason: &str) -> ApiError {
        ApiError::Decode {
            url: "https://pc/api/vmm/v4.0/content/images".to_string(),
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_backend_message_has_context() {
        let err = ToolError::backend("Failed to list images", decode_error("bad json"));
        let text = err.to_string();
        assert!(text.starts_with("Failed to list images: "));
        assert!(text.contains("bad json"));
        assert_eq!(err.kind(), "backend_rejection");
    }

    #[test]
    fn test_backend_keeps_config_category() {
        let err = ToolError::backend(
            "Failed to create VM",
            ApiError::Config(ConfigError::Missing(vec!["NUTANIX_USERNAME"])),
        );
        assert!(matches!(err, ToolError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: NUTANIX_USERNAME"
        );
    }

    #[test]
    fn test_time_format_message() {
        let err = ToolError::TimeFormat("yesterday".to_string());
        assert!(err.to_string().starts_with("Invalid time format: yesterday."));
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_timeout_message() {
        let err = ToolError::Timeout {
            tool: "get_logs".to_string(),
            after: Duration::from_secs(300),
        };
        assert_eq!(err.to_string(), "Tool 'get_logs' timed out after 300s");
    }
}
