//! Core types and utilities for ntnx-mcp
//!
//! # Modules
//!
//! - `config`: Prism Central credentials, backend tunables, environment loading
//! - `error`: Configuration error type and Result alias
//! - `target`: Backend product areas and per-call client configuration

pub mod config;
pub mod error;
pub mod target;

// Re-exports
pub use config::{load_environment, BackendSettings, PrismConfig, PrismCredentials};
pub use error::{ConfigError, Result};
pub use target::{BackendConfiguration, BackendTarget};
