//! Prism Central Configuration
//!
//! Credentials come from four environment variables, read once at startup:
//!
//! ```text
//! NUTANIX_PRISM_CENTRAL_URL=https://prism-central.example.com:9440
//! NUTANIX_USERNAME=admin
//! NUTANIX_PASSWORD=xxxxxxxx
//! CLUSTER_UUID=00061de6-4a87-6b06-185b-ac1f6b6f97e2
//! ```
//!
//! Absent values are not an error at startup. Every tool call asks
//! [`PrismConfig::client_config`] for a fresh [`BackendConfiguration`], and that
//! is where missing or malformed settings are reported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConfigError, Result};
use crate::target::{BackendConfiguration, BackendTarget};

pub const ENV_ENDPOINT: &str = "NUTANIX_PRISM_CENTRAL_URL";
pub const ENV_USERNAME: &str = "NUTANIX_USERNAME";
pub const ENV_PASSWORD: &str = "NUTANIX_PASSWORD";
pub const ENV_CLUSTER: &str = "CLUSTER_UUID";

/// Environment files checked when no explicit path is given (in order of priority)
pub const ENV_FILE_PATHS: &[&str] = &[".env", "/etc/ntnx-mcp/environment"];

/// Load environment variables from a dotenv file.
///
/// An explicit path wins; otherwise `NTNX_ENV_FILE`, then [`ENV_FILE_PATHS`].
/// Variables already present in the process environment are never overridden.
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return try_load_env_file(path);
    }

    if let Ok(custom_path) = std::env::var("NTNX_ENV_FILE") {
        if let Some(path) = try_load_env_file(Path::new(&custom_path)) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded) = try_load_env_file(Path::new(path)) {
            return Some(loaded);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

fn try_load_env_file(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }

    match dotenvy::from_path(path) {
        Ok(()) => {
            info!(path = %path.display(), "Loaded environment file");
            Some(path.to_path_buf())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load environment file");
            None
        }
    }
}

/// Tunables for the backend HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Retries after the first attempt
    pub max_retry_attempts: u32,
    /// Base retry delay in seconds
    pub backoff_factor: u64,
    /// Verify the Prism Central TLS certificate (self-signed by default, so off)
    pub verify_tls: bool,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            backoff_factor: 3,
            verify_tls: false,
            request_timeout_secs: 60,
        }
    }
}

/// Raw credentials as found in the environment
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PrismCredentials {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cluster_ext_id: Option<String>,
}

impl PrismCredentials {
    /// Read the four credential variables; empty values count as absent
    pub fn from_env() -> Self {
        fn read(key: &str) -> Option<String> {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            endpoint: read(ENV_ENDPOINT),
            username: read(ENV_USERNAME),
            password: read(ENV_PASSWORD),
            cluster_ext_id: read(ENV_CLUSTER),
        }
    }

    /// Names of the variables that are not set
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (ENV_ENDPOINT, &self.endpoint),
            (ENV_USERNAME, &self.username),
            (ENV_PASSWORD, &self.password),
            (ENV_CLUSTER, &self.cluster_ext_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for PrismCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrismCredentials")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("cluster_ext_id", &self.cluster_ext_id)
            .finish()
    }
}

/// Read-only configuration shared by every tool invocation
#[derive(Debug, Clone, Default)]
pub struct PrismConfig {
    credentials: PrismCredentials,
    backend: BackendSettings,
}

impl PrismConfig {
    pub fn new(credentials: PrismCredentials, backend: BackendSettings) -> Self {
        Self {
            credentials,
            backend,
        }
    }

    /// Snapshot the credential variables from the current environment
    pub fn from_env(backend: BackendSettings) -> Self {
        let credentials = PrismCredentials::from_env();
        let missing = credentials.missing();
        if missing.is_empty() {
            info!(
                endpoint = credentials.endpoint.as_deref().unwrap_or_default(),
                "Prism Central credentials loaded"
            );
        } else {
            // Reported again, per call, when a tool needs them
            warn!(missing = ?missing, "Prism Central credentials incomplete");
        }
        Self::new(credentials, backend)
    }

    /// Fail unless all four credential variables are present
    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.credentials.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    /// Identifier of the cluster that VM and log operations are scoped to
    pub fn cluster_ext_id(&self) -> Result<&str> {
        self.credentials
            .cluster_ext_id
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(vec![ENV_CLUSTER]))
    }

    /// Build a fresh client configuration for one backend call
    pub fn client_config(&self, target: BackendTarget) -> Result<BackendConfiguration> {
        self.ensure_complete()?;

        let endpoint = self.credentials.endpoint.as_deref().unwrap_or_default();
        let (scheme, host, port) = parse_endpoint(endpoint)?;

        Ok(BackendConfiguration {
            target,
            scheme,
            host,
            port,
            username: self.credentials.username.clone().unwrap_or_default(),
            password: self.credentials.password.clone().unwrap_or_default(),
            max_retry_attempts: self.backend.max_retry_attempts,
            backoff_factor: self.backend.backoff_factor,
            verify_tls: self.backend.verify_tls,
            request_timeout: Duration::from_secs(self.backend.request_timeout_secs),
        })
    }
}

/// Split an endpoint URL into scheme, host and port.
///
/// A bare `host:port` is treated as https. Without an explicit port the
/// scheme's well-known port is used.
pub fn parse_endpoint(raw: &str) -> Result<(String, String, u16)> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ConfigError::invalid_endpoint(raw, e.to_string()))?;

    let scheme = url.scheme();
    if scheme != "https" && scheme != "http" {
        return Err(ConfigError::invalid_endpoint(
            raw,
            format!("unsupported scheme '{}'", scheme),
        ));
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ConfigError::invalid_endpoint(raw, "missing host"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| ConfigError::invalid_endpoint(raw, "missing port"))?;

    Ok((scheme.to_string(), host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> PrismCredentials {
        PrismCredentials {
            endpoint: Some("https://10.0.0.5:9440".to_string()),
            username: Some("admin".to_string()),
            password: Some("nutanix/4u".to_string()),
            cluster_ext_id: Some("0005a0b1-cluster".to_string()),
        }
    }

    #[test]
    fn test_parse_endpoint_with_port() {
        let (scheme, host, port) = parse_endpoint("https://10.0.0.5:9440").unwrap();
        assert_eq!(scheme, "https");
        assert_eq!(host, "10.0.0.5");
        assert_eq!(port, 9440);
    }

    #[test]
    fn test_parse_endpoint_without_scheme() {
        let (scheme, host, port) = parse_endpoint("pc.example.com:9440").unwrap();
        assert_eq!(scheme, "https");
        assert_eq!(host, "pc.example.com");
        assert_eq!(port, 9440);
    }

    #[test]
    fn test_parse_endpoint_default_port() {
        let (_, _, port) = parse_endpoint("https://pc.example.com").unwrap();
        assert_eq!(port, 443);
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        assert!(matches!(
            parse_endpoint("https://pc.example.com:notaport"),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            parse_endpoint("ftp://pc.example.com:21"),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
        assert!(parse_endpoint("").is_err());
    }

    #[test]
    fn test_missing_reports_names() {
        let creds = PrismCredentials {
            username: Some("admin".to_string()),
            ..Default::default()
        };
        assert_eq!(
            creds.missing(),
            vec![ENV_ENDPOINT, ENV_PASSWORD, ENV_CLUSTER]
        );
    }

    #[test]
    fn test_client_config_requires_all_credentials() {
        let mut creds = complete();
        creds.cluster_ext_id = None;
        let config = PrismConfig::new(creds, BackendSettings::default());

        let err = config.client_config(BackendTarget::Vmm).unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![ENV_CLUSTER]));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = PrismConfig::new(complete(), BackendSettings::default());
        let client = config.client_config(BackendTarget::Monitoring).unwrap();

        assert_eq!(client.target, BackendTarget::Monitoring);
        assert_eq!(client.host, "10.0.0.5");
        assert_eq!(client.port, 9440);
        assert_eq!(client.max_retry_attempts, 3);
        assert_eq!(client.backoff_factor, 3);
        assert!(!client.verify_tls);
        assert_eq!(client.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_client_config_is_fresh_per_call() {
        let config = PrismConfig::new(complete(), BackendSettings::default());
        let first = config.client_config(BackendTarget::Vmm).unwrap();
        let second = config.client_config(BackendTarget::Vmm).unwrap();
        assert_eq!(first, second);
        assert_ne!(
            first.base_url(),
            config.client_config(BackendTarget::Prism).unwrap().base_url()
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("nutanix/4u"));
    }

    #[test]
    fn test_backend_settings_partial_deserialize() {
        let settings: BackendSettings =
            serde_json::from_str(r#"{"verify_tls": true}"#).unwrap();
        assert!(settings.verify_tls);
        assert_eq!(settings.max_retry_attempts, 3);
    }

    #[test]
    fn test_load_environment_explicit_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NTNX_CORE_TEST_ONLY_VAR=loaded").unwrap();

        let loaded = load_environment(Some(file.path()));
        assert_eq!(loaded.as_deref(), Some(file.path()));
        assert_eq!(
            std::env::var("NTNX_CORE_TEST_ONLY_VAR").as_deref(),
            Ok("loaded")
        );
    }

    #[test]
    fn test_load_environment_missing_file() {
        assert!(load_environment(Some(Path::new("/nonexistent/ntnx.env"))).is_none());
    }
}
