//! Error types for Prism Central API calls

use ntnx_core::{BackendTarget, ConfigError};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Client targets '{actual}' but '{expected}' was required")]
    WrongTarget {
        expected: BackendTarget,
        actual: BackendTarget,
    },
}

impl ApiError {
    /// Build a status error from a raw response body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            message: backend_message(body),
        }
    }

    /// HTTP status for rejections, None for anything that never got an answer
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the remote API itself rejected the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}

/// Pull the human-readable message out of a Prism error body.
///
/// v4 errors look like `{"data": {"error": [{"message": "..."}]}}`; schema
/// failures carry `validationErrorMessages` instead. Anything else is passed
/// through as text.
pub fn backend_message(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "no response body".to_string();
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    let mut messages = Vec::new();
    if let Some(error) = value.pointer("/data/error") {
        collect_messages(error, &mut messages);
    }
    if messages.is_empty() {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            messages.push(message.to_string());
        }
    }

    if messages.is_empty() {
        body.to_string()
    } else {
        messages.join("; ")
    }
}

fn collect_messages(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::Array(items) => items.iter().for_each(|item| collect_messages(item, out)),
        Value::Object(map) => {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                out.push(message.to_string());
            }
            if let Some(nested) = map.get("validationErrorMessages") {
                collect_messages(nested, out);
            }
        }
        _ => {}
    }
}
