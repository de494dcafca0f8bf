//! Monitoring API: alerts and cluster log collection

use ntnx_core::{BackendConfiguration, BackendTarget, PrismConfig};
use serde_json::Value;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{ApiResponse, LogCollectionSpec, TaskReference};

const ALERTS_PATH: &[&str] = &["serviceability", "alerts"];

/// Client for the `monitoring` namespace
pub struct MonitoringClient {
    api: ApiClient,
}

impl MonitoringClient {
    /// Wrap an existing client; it must target the monitoring namespace
    pub fn from_api(api: ApiClient) -> Result<Self, ApiError> {
        api.expect_target(BackendTarget::Monitoring)?;
        Ok(Self { api })
    }

    /// Resolve a fresh monitoring client from the shared configuration
    pub fn resolve(prism: &PrismConfig) -> Result<(Self, BackendConfiguration), ApiError> {
        let (api, config) = ApiClient::resolve(prism, BackendTarget::Monitoring)?;
        Ok((Self { api }, config))
    }

    /// List alerts as raw backend records
    pub async fn list_alerts(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ApiResponse<Vec<Value>>, ApiError> {
        self.api
            .get(
                ALERTS_PATH,
                &[("$page", page.to_string()), ("$limit", limit.to_string())],
            )
            .await
    }

    /// Start a log collection on a cluster
    ///
    /// Returns the task reference for tracking the collection
    pub async fn collect_logs(
        &self,
        cluster_ext_id: &str,
        spec: &LogCollectionSpec,
    ) -> Result<ApiResponse<TaskReference>, ApiError> {
        let path = [
            "serviceability",
            "clusters",
            cluster_ext_id,
            "$actions",
            "collect-logs",
        ];
        info!(
            cluster = %cluster_ext_id,
            start = %spec.start_time,
            end = %spec.end_time,
            "Collecting cluster logs"
        );
        self.api.post(&path, spec).await
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
