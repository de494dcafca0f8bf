//! Server settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `NTNX_MCP__*` environment variables
//! (e.g. `NTNX_MCP__BACKEND__VERIFY_TLS=true`).
//!
//! Prism Central credentials are not part of this file; they come from the
//! environment (see `ntnx_core::config`).

use config::{Config, ConfigError, Environment, File};
use ntnx_core::BackendSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::SERVER_NAME;

/// Looked up relative to the working directory, extension optional
pub const DEFAULT_CONFIG_FILE: &str = "config/default";
pub const ENV_PREFIX: &str = "NTNX_MCP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub name: String,
    /// Deadline for one tool call in seconds; 0 disables it
    pub tool_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            tool_timeout_secs: 300,
        }
    }
}

impl ServerSettings {
    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `path` must exist; without one the default file is used
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let s = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        s.try_deserialize()
    }
}
