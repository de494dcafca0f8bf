//! Prism platform API: task tracking

use ntnx_core::{BackendConfiguration, BackendTarget, PrismConfig};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{ApiResponse, Task};

/// Client for the `prism` namespace
pub struct PrismClient {
    api: ApiClient,
}

impl PrismClient {
    /// Wrap an existing client; it must target the prism namespace
    pub fn from_api(api: ApiClient) -> Result<Self, ApiError> {
        api.expect_target(BackendTarget::Prism)?;
        Ok(Self { api })
    }

    /// Resolve a fresh prism client from the shared configuration
    pub fn resolve(prism: &PrismConfig) -> Result<(Self, BackendConfiguration), ApiError> {
        let (api, config) = ApiClient::resolve(prism, BackendTarget::Prism)?;
        Ok((Self { api }, config))
    }

    /// Get the current state of an asynchronous task
    pub async fn get_task(&self, task_ext_id: &str) -> Result<ApiResponse<Task>, ApiError> {
        self.api.get(&["config", "tasks", task_ext_id], &[]).await
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
