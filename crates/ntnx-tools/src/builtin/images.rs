//! Image Tools
//!
//! List and create images through the Prism Central vmm content API.

use async_trait::async_trait;
use ntnx_client::{Image, ImageSource, ImageType, UrlSource, VmmClient};
use ntnx_core::PrismConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ToolError;
use crate::response::ToolOutput;
use crate::tool::{parse_args, SecurityLevel, Tool};

/// First page only; larger inventories are truncated
const LIST_PAGE: u32 = 0;
const LIST_LIMIT: u32 = 50;

/// Projection of one image record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub name: String,
    pub size_bytes: Option<u64>,
    #[serde(rename = "type")]
    pub image_type: String,
}

/// An image record that could not be projected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub ext_id: Option<String>,
    pub reason: String,
}

fn summarize(record: &Value) -> Result<ImageSummary, String> {
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .ok_or("missing or non-string 'name'")?;
    let image_type = record
        .get("type")
        .and_then(Value::as_str)
        .ok_or("missing or non-string 'type'")?;
    let size_bytes = match record.get("sizeBytes") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_u64().ok_or("'sizeBytes' is not a non-negative integer")?),
    };

    Ok(ImageSummary {
        name: name.to_string(),
        size_bytes,
        image_type: image_type.to_string(),
    })
}

/// Project raw image records, keeping the ones that fail alongside the reason
pub fn summarize_images(records: &[Value]) -> (Vec<ImageSummary>, Vec<SkippedRecord>) {
    let mut images = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match summarize(record) {
            Ok(summary) => images.push(summary),
            Err(reason) => skipped.push(SkippedRecord {
                index,
                ext_id: record
                    .get("extId")
                    .and_then(Value::as_str)
                    .map(String::from),
                reason: reason.to_string(),
            }),
        }
    }

    (images, skipped)
}

/// Tool to list images
pub struct ListImagesTool {
    config: Arc<PrismConfig>,
}

impl ListImagesTool {
    pub fn new(config: Arc<PrismConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for ListImagesTool {
    fn name(&self) -> &str {
        "list_images"
    }

    fn description(&self) -> &str {
        "List images in Prism Central (first 50). Returns name, size_bytes and type for each image, plus any records that could not be read."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    fn category(&self) -> &str {
        "images"
    }

    fn tags(&self) -> Vec<String> {
        vec!["images".into(), "vmm".into(), "list".into()]
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput, ToolError> {
        const CONTEXT: &str = "Failed to list images";
        self.config.ensure_complete()?;

        let (client, _) =
            VmmClient::resolve(&self.config).map_err(|e| ToolError::backend(CONTEXT, e))?;
        let response = client
            .list_images(LIST_PAGE, LIST_LIMIT)
            .await
            .map_err(|e| ToolError::backend(CONTEXT, e))?;

        let records = response
            .data
            .ok_or_else(|| ToolError::no_data("No images found in response"))?;

        let (images, skipped) = summarize_images(&records);
        for record in &skipped {
            warn!(
                index = record.index,
                ext_id = record.ext_id.as_deref().unwrap_or("-"),
                reason = %record.reason,
                "Skipping unreadable image record"
            );
        }

        if images.is_empty() {
            return Err(ToolError::no_data("No valid images found"));
        }

        Ok(ToolOutput::new("Images retrieved")
            .with("images", json!(images))
            .with("skipped", json!(skipped)))
    }
}

#[derive(Debug, Deserialize)]
struct CreateImageArgs {
    name: String,
    source_uri: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_type: Option<String>,
}

/// Tool to create an image from a URL
pub struct CreateImageTool {
    config: Arc<PrismConfig>,
}

impl CreateImageTool {
    pub fn new(config: Arc<PrismConfig>) -> Self {
        Self { config }
    }

    fn build_image(args: CreateImageArgs) -> Result<Image, ToolError> {
        if args.name.trim().is_empty() {
            return Err(ToolError::validation("Image name must not be empty"));
        }
        if args.source_uri.trim().is_empty() {
            return Err(ToolError::validation("source_uri must not be empty"));
        }

        let image_type = match args.image_type.as_deref() {
            Some(raw) => raw.parse::<ImageType>().map_err(ToolError::Validation)?,
            None => ImageType::default(),
        };

        Ok(Image {
            name: args.name,
            description: args.description.filter(|d| !d.is_empty()),
            image_type,
            source: ImageSource::Url(UrlSource {
                url: args.source_uri,
                should_allow_insecure_url: true,
            }),
        })
    }
}

#[async_trait]
impl Tool for CreateImageTool {
    fn name(&self) -> &str {
        "create_image"
    }

    fn description(&self) -> &str {
        "Create an image in Prism Central from a URL source. Returns the task id to track the upload."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Image name"
                },
                "source_uri": {
                    "type": "string",
                    "description": "URL to fetch the image from (insecure URLs allowed)"
                },
                "description": {
                    "type": "string",
                    "description": "Optional description"
                },
                "image_type": {
                    "type": "string",
                    "enum": ["ISO_IMAGE", "DISK_IMAGE"],
                    "description": "Image type (default: ISO_IMAGE)"
                }
            },
            "required": ["name", "source_uri"]
        })
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Modify
    }

    fn category(&self) -> &str {
        "images"
    }

    fn tags(&self) -> Vec<String> {
        vec!["images".into(), "vmm".into(), "create".into()]
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        const CONTEXT: &str = "Failed to create image";
        self.config.ensure_complete()?;

        let image = Self::build_image(parse_args(input)?)?;
        let (client, _) =
            VmmClient::resolve(&self.config).map_err(|e| ToolError::backend(CONTEXT, e))?;
        let response = client
            .create_image(&image)
            .await
            .map_err(|e| ToolError::backend(CONTEXT, e))?;

        let task = response
            .data
            .ok_or_else(|| ToolError::no_data(format!("{}: Invalid response", CONTEXT)))?;
        info!(name = %image.name, task = ?task.ext_id, "Image creation initiated");

        Ok(ToolOutput::new("Image creation initiated").with("task_ext_id", json!(task.ext_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_reports_bad_records() {
        let records = vec![
            json!({"extId": "a", "name": "rocky", "type": "ISO_IMAGE", "sizeBytes": 10}),
            json!({"extId": "b", "type": "DISK_IMAGE"}),
            json!({"extId": "c", "name": "win", "type": "DISK_IMAGE", "sizeBytes": -1}),
            json!({"name": "ubuntu", "type": "DISK_IMAGE"}),
        ];

        let (images, skipped) = summarize_images(&records);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].size_bytes, Some(10));
        assert_eq!(images[1].name, "ubuntu");
        assert_eq!(images[1].size_bytes, None);

        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].index, 1);
        assert_eq!(skipped[0].ext_id.as_deref(), Some("b"));
        assert!(skipped[0].reason.contains("name"));
        assert_eq!(skipped[1].ext_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_summary_serializes_type_key() {
        let summary = ImageSummary {
            name: "rocky".into(),
            size_bytes: None,
            image_type: "ISO_IMAGE".into(),
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"name": "rocky", "size_bytes": null, "type": "ISO_IMAGE"})
        );
    }

    #[test]
    fn test_build_image_honours_type() {
        let image = CreateImageTool::build_image(
            parse_args(json!({
                "name": "disk",
                "source_uri": "http://x/disk.qcow2",
                "image_type": "disk_image"
            }))
            .unwrap(),
        )
        .unwrap();
        assert_eq!(image.image_type, ImageType::DiskImage);

        let image = CreateImageTool::build_image(
            parse_args(json!({"name": "iso", "source_uri": "http://x/a.iso"})).unwrap(),
        )
        .unwrap();
        assert_eq!(image.image_type, ImageType::IsoImage);
    }

    #[test]
    fn test_build_image_rejects_unknown_type() {
        let err = CreateImageTool::build_image(
            parse_args(json!({"name": "x", "source_uri": "http://x", "image_type": "VMDK"}))
                .unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }
}
