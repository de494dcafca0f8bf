//! VM management API: images and AHV virtual machines

use ntnx_core::{BackendConfiguration, BackendTarget, PrismConfig};
use serde_json::Value;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{ApiResponse, Image, TaskReference, Vm};

const IMAGES_PATH: &[&str] = &["content", "images"];
const VMS_PATH: &[&str] = &["ahv", "config", "vms"];

/// Client for the `vmm` namespace
pub struct VmmClient {
    api: ApiClient,
}

impl VmmClient {
    /// Wrap an existing client; it must target the vmm namespace
    pub fn from_api(api: ApiClient) -> Result<Self, ApiError> {
        api.expect_target(BackendTarget::Vmm)?;
        Ok(Self { api })
    }

    /// Resolve a fresh vmm client from the shared configuration
    pub fn resolve(prism: &PrismConfig) -> Result<(Self, BackendConfiguration), ApiError> {
        let (api, config) = ApiClient::resolve(prism, BackendTarget::Vmm)?;
        Ok((Self { api }, config))
    }

    /// List images, one page at a time.
    ///
    /// Records are returned untyped so callers can decide how to treat
    /// entries that do not match the expected shape.
    pub async fn list_images(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ApiResponse<Vec<Value>>, ApiError> {
        self.api
            .get(
                IMAGES_PATH,
                &[("$page", page.to_string()), ("$limit", limit.to_string())],
            )
            .await
    }

    /// Start creating an image
    ///
    /// Returns the task reference for tracking the upload
    pub async fn create_image(
        &self,
        image: &Image,
    ) -> Result<ApiResponse<TaskReference>, ApiError> {
        info!(name = %image.name, image_type = %image.image_type, "Creating image");
        self.api.post(IMAGES_PATH, image).await
    }

    /// Start creating a VM
    ///
    /// Returns the task reference for tracking creation
    pub async fn create_vm(&self, vm: &Vm) -> Result<ApiResponse<TaskReference>, ApiError> {
        info!(
            name = %vm.name,
            sockets = vm.num_sockets,
            cores_per_socket = vm.num_cores_per_socket,
            memory_bytes = vm.memory_size_bytes,
            "Creating VM"
        );
        self.api.post(VMS_PATH, vm).await
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
