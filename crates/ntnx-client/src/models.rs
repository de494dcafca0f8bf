//! Prism Central v4 request and response models
//!
//! Only the fields the tools populate or read are modelled. Polymorphic
//! fields use the `$objectType` discriminator the v4 API expects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Standard v4 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn empty() -> Self {
        Self {
            data: None,
            metadata: None,
        }
    }
}

/// Handle to an asynchronous operation started by a create/action call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReference {
    #[serde(default)]
    pub ext_id: Option<String>,
}

// =========================================================================
// vmm: images
// =========================================================================

/// Image kind accepted by the image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    DiskImage,
    #[default]
    IsoImage,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::DiskImage => "DISK_IMAGE",
            ImageType::IsoImage => "ISO_IMAGE",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DISK_IMAGE" => Ok(ImageType::DiskImage),
            "ISO_IMAGE" => Ok(ImageType::IsoImage),
            other => Err(format!(
                "Unsupported image type '{}'. Use DISK_IMAGE or ISO_IMAGE",
                other
            )),
        }
    }
}

/// Image to create
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub image_type: ImageType,
    pub source: ImageSource,
}

/// Where the image service fetches the image content from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$objectType")]
pub enum ImageSource {
    #[serde(rename = "vmm.v4.content.UrlSource")]
    Url(UrlSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSource {
    pub url: String,
    #[serde(default)]
    pub should_allow_insecure_url: bool,
}

// =========================================================================
// vmm: AHV virtual machines
// =========================================================================

/// VM to create
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cluster: ClusterReference,
    pub num_sockets: u32,
    pub num_cores_per_socket: u32,
    pub memory_size_bytes: u64,
    pub source: VmSourceReference,
    pub cd_roms: Vec<CdRom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReference {
    pub ext_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmSourceReference {
    pub entity_type: VmSourceReferenceEntityType,
    pub ext_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VmSourceReferenceEntityType {
    Vm,
    VmRecoveryPoint,
}

/// CD-ROM slot; no backing media means an empty drive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdRom {
    pub disk_address: CdRomAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdRomAddress {
    pub bus_type: CdRomBusType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CdRomBusType {
    Ide,
    Sata,
}

impl CdRom {
    /// Empty drive on the IDE bus, slot chosen by the backend
    pub fn empty_ide() -> Self {
        Self {
            disk_address: CdRomAddress {
                bus_type: CdRomBusType::Ide,
                index: None,
            },
        }
    }
}

// =========================================================================
// monitoring: log collection
// =========================================================================

/// Request to collect and upload cluster logs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogCollectionSpec {
    /// ISO-8601 UTC, e.g. `2025-03-31T00:00:00Z`
    pub start_time: String,
    pub end_time: String,
    pub archive_opts: ArchiveOpts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveOpts {
    pub archive_name: String,
    pub upload_params: UploadParams,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "$objectType")]
pub enum UploadParams {
    #[serde(rename = "monitoring.v4.serviceability.NtnxServerUploadParams")]
    NtnxServer(NtnxServerUploadParams),
}

/// Upload to the Nutanix support server, attached to a support case
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NtnxServerUploadParams {
    pub case_number: u64,
    pub protocol: ServerUploadProtocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerUploadProtocol {
    Ftp,
    Sftp,
}

// =========================================================================
// prism: tasks
// =========================================================================

/// Asynchronous operation as reported by the task service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub ext_id: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    /// QUEUED, RUNNING, SUCCEEDED, FAILED, CANCELED, ...
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress_percentage: Option<u32>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub completed_time: Option<String>,
    #[serde(default)]
    pub error_messages: Vec<AppMessage>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}
