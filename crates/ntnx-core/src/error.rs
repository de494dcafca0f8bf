//! Error types for configuration resolution

use thiserror::Error;

/// Failure to turn the loaded settings into a usable backend configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Unsupported backend module '{0}'")]
    UnknownTarget(String),
}

/// Result type alias using ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error reports absent settings (as opposed to malformed ones)
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Missing(_))
    }
}
