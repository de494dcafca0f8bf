//! Backend targets and per-call client configuration
//!
//! Prism Central exposes one REST namespace per product area. Each area the
//! server talks to is a variant of [`BackendTarget`]; the namespace and API
//! version are fixed per variant, so a target can never fail to resolve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Prism Central v4 API version used for every namespace
pub const API_VERSION: &str = "v4.0";

/// Product area of the Prism Central REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTarget {
    /// Virtual machine management: images and AHV VMs
    Vmm,
    /// Serviceability: alerts and cluster log collection
    Monitoring,
    /// Platform services: task tracking
    Prism,
}

impl BackendTarget {
    /// REST namespace segment (`/api/<namespace>/...`)
    pub fn namespace(&self) -> &'static str {
        match self {
            BackendTarget::Vmm => "vmm",
            BackendTarget::Monitoring => "monitoring",
            BackendTarget::Prism => "prism",
        }
    }

    pub fn api_version(&self) -> &'static str {
        API_VERSION
    }

    /// Path prefix shared by every endpoint of this target
    pub fn base_path(&self) -> String {
        format!("/api/{}/{}", self.namespace(), self.api_version())
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for BackendTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vmm" => Ok(BackendTarget::Vmm),
            "monitoring" => Ok(BackendTarget::Monitoring),
            "prism" => Ok(BackendTarget::Prism),
            other => Err(ConfigError::UnknownTarget(other.to_string())),
        }
    }
}

/// Connection settings for one backend call.
///
/// Built fresh for every tool invocation and dropped when it returns.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfiguration {
    pub target: BackendTarget,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Retries after the first attempt
    pub max_retry_attempts: u32,
    /// Base delay in seconds, doubled on every retry
    pub backoff_factor: u64,
    pub verify_tls: bool,
    pub request_timeout: Duration,
}

impl BackendConfiguration {
    /// Root URL for this target, e.g. `https://pc:9440/api/vmm/v4.0`
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme,
            self.host,
            self.port,
            self.target.base_path()
        )
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        if retry == 0 || self.backoff_factor == 0 {
            return Duration::ZERO;
        }
        let multiplier = 1u64 << (retry - 1).min(16);
        Duration::from_secs(self.backoff_factor.saturating_mul(multiplier))
    }
}

impl fmt::Debug for BackendConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfiguration")
            .field("target", &self.target)
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("max_retry_attempts", &self.max_retry_attempts)
            .field("backoff_factor", &self.backoff_factor)
            .field("verify_tls", &self.verify_tls)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(target: BackendTarget) -> BackendConfiguration {
        BackendConfiguration {
            target,
            scheme: "https".to_string(),
            host: "pc.example.com".to_string(),
            port: 9440,
            username: "admin".to_string(),
            password: "secret".to_string(),
            max_retry_attempts: 3,
            backoff_factor: 3,
            verify_tls: false,
            request_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("vmm".parse::<BackendTarget>().unwrap(), BackendTarget::Vmm);
        assert_eq!(
            " Monitoring ".parse::<BackendTarget>().unwrap(),
            BackendTarget::Monitoring
        );
        assert_eq!(
            "clustermgmt".parse::<BackendTarget>(),
            Err(ConfigError::UnknownTarget("clustermgmt".to_string()))
        );
    }

    #[test]
    fn test_base_url_per_target() {
        assert_eq!(
            sample(BackendTarget::Vmm).base_url(),
            "https://pc.example.com:9440/api/vmm/v4.0"
        );
        assert_eq!(
            sample(BackendTarget::Monitoring).base_url(),
            "https://pc.example.com:9440/api/monitoring/v4.0"
        );
        assert_eq!(
            sample(BackendTarget::Prism).base_url(),
            "https://pc.example.com:9440/api/prism/v4.0"
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let config = sample(BackendTarget::Vmm);
        assert_eq!(config.backoff_delay(0), Duration::ZERO);
        assert_eq!(config.backoff_delay(1), Duration::from_secs(3));
        assert_eq!(config.backoff_delay(2), Duration::from_secs(6));
        assert_eq!(config.backoff_delay(3), Duration::from_secs(12));
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", sample(BackendTarget::Vmm));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }
}
