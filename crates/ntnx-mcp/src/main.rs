//! ntnx-mcp-server: MCP server for Nutanix Prism Central
//!
//! Serves the Prism Central tools over stdio:
//!   ntnx-mcp-server                              # defaults, .env in the working directory
//!   ntnx-mcp-server --env-file /etc/ntnx.env     # credentials from a specific file
//!   ntnx-mcp-server --config ntnx.toml --tool-timeout 120
//!
//! Credentials: NUTANIX_PRISM_CENTRAL_URL, NUTANIX_USERNAME, NUTANIX_PASSWORD,
//! CLUSTER_UUID.

use anyhow::{Context, Result};
use clap::Parser;
use ntnx_core::{load_environment, PrismConfig};
use ntnx_mcp::transport::{StdioTransport, Transport};
use ntnx_mcp::{McpServer, McpServerConfig, Settings};
use ntnx_tools::RegistryConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ntnx-mcp-server")]
#[command(version, about = "MCP server exposing Nutanix Prism Central operations as tools")]
struct Cli {
    /// Settings file (TOML); defaults to config/default.toml when present
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File with credential variables (default: $NTNX_ENV_FILE, then .env)
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Server name override
    #[arg(long)]
    name: Option<String>,

    /// Tool call deadline in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    tool_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr to not interfere with stdio transport)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if load_environment(cli.env_file.as_deref()).is_none() {
        if let Some(path) = &cli.env_file {
            warn!(path = %path.display(), "Environment file not loaded");
        }
    }

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(name) = cli.name {
        settings.server.name = name;
    }
    if let Some(secs) = cli.tool_timeout {
        settings.server.tool_timeout_secs = secs;
    }

    info!(
        name = %settings.server.name,
        tool_timeout_secs = settings.server.tool_timeout_secs,
        max_retry_attempts = settings.backend.max_retry_attempts,
        verify_tls = settings.backend.verify_tls,
        "Starting ntnx-mcp-server"
    );

    let prism = Arc::new(PrismConfig::from_env(settings.backend.clone()));
    let server = McpServer::new(
        McpServerConfig {
            name: Some(settings.server.name.clone()),
        },
        prism,
        RegistryConfig {
            call_timeout: settings.server.tool_timeout(),
        },
    )
    .await?;
    info!("MCP server initialized");

    StdioTransport::new().serve(server).await
}
