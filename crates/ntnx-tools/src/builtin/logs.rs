//! Log collection tool

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use ntnx_client::{
    ArchiveOpts, LogCollectionSpec, MonitoringClient, NtnxServerUploadParams,
    ServerUploadProtocol, UploadParams,
};
use ntnx_core::PrismConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::ToolError;
use crate::response::ToolOutput;
use crate::timefmt::{parse_window, to_iso8601};
use crate::tool::{parse_args, SecurityLevel, Tool};

pub const ARCHIVE_NAME: &str = "NTNX-Log";

#[derive(Debug, Deserialize)]
struct GetLogsArgs {
    start_time: String,
    end_time: String,
    case_number: u64,
}

/// Tool to collect cluster logs for a time window and upload them to a support case
pub struct GetLogsTool {
    config: Arc<PrismConfig>,
}

impl GetLogsTool {
    pub fn new(config: Arc<PrismConfig>) -> Self {
        Self { config }
    }
}

fn build_spec(args: &GetLogsArgs, year: i32) -> Result<LogCollectionSpec, ToolError> {
    let (start, end) = parse_window(&args.start_time, &args.end_time, year)?;

    Ok(LogCollectionSpec {
        start_time: to_iso8601(&start),
        end_time: to_iso8601(&end),
        archive_opts: ArchiveOpts {
            archive_name: ARCHIVE_NAME.to_string(),
            upload_params: UploadParams::NtnxServer(NtnxServerUploadParams {
                case_number: args.case_number,
                protocol: ServerUploadProtocol::Ftp,
            }),
        },
    })
}

#[async_trait]
impl Tool for GetLogsTool {
    fn name(&self) -> &str {
        "get_logs"
    }

    fn description(&self) -> &str {
        "Collect cluster logs between two times and upload them over FTP to a Nutanix support case. Times look like '31 march 12 AM' or '31 march 2025 12:00 AM' (UTC, current year if omitted)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "start_time": {
                    "type": "string",
                    "description": "Window start, e.g. '31 march 2025 12 AM'"
                },
                "end_time": {
                    "type": "string",
                    "description": "Window end, must be after start_time"
                },
                "case_number": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Support case the archive is attached to"
                }
            },
            "required": ["start_time", "end_time", "case_number"]
        })
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Modify
    }

    fn category(&self) -> &str {
        "logs"
    }

    fn tags(&self) -> Vec<String> {
        vec!["logs".into(), "monitoring".into(), "support".into()]
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        const CONTEXT: &str = "Failed to collect logs";
        self.config.ensure_complete()?;

        let cluster_ext_id = self.config.cluster_ext_id()?;
        let args: GetLogsArgs = parse_args(input)?;
        let spec = build_spec(&args, Utc::now().year())?;

        let (client, _) =
            MonitoringClient::resolve(&self.config).map_err(|e| ToolError::backend(CONTEXT, e))?;
        let response = client
            .collect_logs(cluster_ext_id, &spec)
            .await
            .map_err(|e| ToolError::backend(CONTEXT, e))?;

        let task_ext_id = response.data.and_then(|task| task.ext_id);
        info!(
            case_number = args.case_number,
            task = ?task_ext_id,
            "Logs collection initiated"
        );

        Ok(ToolOutput::new("Logs collection initiated")
            .with("task_ext_id", json!(task_ext_id))
            .with("start_time", spec.start_time)
            .with("end_time", spec.end_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: &str, end: &str) -> GetLogsArgs {
        GetLogsArgs {
            start_time: start.to_string(),
            end_time: end.to_string(),
            case_number: 7,
        }
    }

    #[test]
    fn test_build_spec() {
        let spec =
            build_spec(&args("31 march 2025 12:00 AM", "31 march 2025 1:00 AM"), 2030).unwrap();
        assert_eq!(spec.start_time, "2025-03-31T00:00:00Z");
        assert_eq!(spec.end_time, "2025-03-31T01:00:00Z");
        assert_eq!(spec.archive_opts.archive_name, "NTNX-Log");

        let UploadParams::NtnxServer(upload) = &spec.archive_opts.upload_params;
        assert_eq!(upload.case_number, 7);
        assert_eq!(upload.protocol, ServerUploadProtocol::Ftp);
    }

    #[test]
    fn test_build_spec_rejects_reversed_window() {
        let err = build_spec(&args("31 march 2 PM", "31 march 1 PM"), 2026).unwrap_err();
        assert_eq!(err.to_string(), "End time must be after start time");
    }
}
