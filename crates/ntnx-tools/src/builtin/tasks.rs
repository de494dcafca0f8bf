//! Task tracking tool
//!
//! Create operations return a task id; this tool reports how far that task
//! has progressed.

use async_trait::async_trait;
use ntnx_client::{PrismClient, Task};
use ntnx_core::PrismConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ToolError;
use crate::response::ToolOutput;
use crate::tool::{parse_args, Tool};

#[derive(Debug, Deserialize)]
struct GetTaskArgs {
    task_ext_id: String,
}

/// Task ids are opaque single path segments
fn validate_task_ext_id(raw: &str) -> Result<&str, ToolError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ToolError::validation("task_ext_id must not be empty"));
    }
    if id == "." || id == ".." || id.contains(['/', '\\', '?', '#']) {
        return Err(ToolError::validation(format!(
            "Invalid task_ext_id '{}': must not contain '/', '\\', '?' or '#'",
            id
        )));
    }
    Ok(id)
}

/// Plain projection of a backend task
pub fn task_summary(task: &Task) -> Value {
    let errors: Vec<&str> = task
        .error_messages
        .iter()
        .filter_map(|m| m.message.as_deref())
        .collect();

    json!({
        "ext_id": task.ext_id,
        "status": task.status,
        "progress_percentage": task.progress_percentage,
        "operation": task.operation,
        "created_time": task.created_time,
        "completed_time": task.completed_time,
        "error_messages": errors,
    })
}

/// Tool to look up an asynchronous task
pub struct GetTaskTool {
    config: Arc<PrismConfig>,
}

impl GetTaskTool {
    pub fn new(config: Arc<PrismConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for GetTaskTool {
    fn name(&self) -> &str {
        "get_task"
    }

    fn description(&self) -> &str {
        "Get status and progress of a Prism Central task, e.g. the task_ext_id \
         returned by create_image, create_vm or get_logs."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_ext_id": {
                    "type": "string",
                    "description": "Task identifier"
                }
            },
            "required": ["task_ext_id"]
        })
    }

    fn category(&self) -> &str {
        "tasks"
    }

    fn tags(&self) -> Vec<String> {
        vec!["tasks".into(), "prism".into(), "status".into()]
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        const CONTEXT: &str = "Failed to retrieve task";
        self.config.ensure_complete()?;

        let args: GetTaskArgs = parse_args(input)?;
        let task_ext_id = validate_task_ext_id(&args.task_ext_id)?;

        let (client, _) =
            PrismClient::resolve(&self.config).map_err(|e| ToolError::backend(CONTEXT, e))?;
        let task = client
            .get_task(task_ext_id)
            .await
            .map_err(|e| ToolError::backend(CONTEXT, e))?
            .data
            .ok_or_else(|| ToolError::no_data("Invalid response from tasks API"))?;

        Ok(ToolOutput::new("Task retrieved").with("task", task_summary(&task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ext_id_accepts_plain_ids() {
        assert_eq!(
            validate_task_ext_id(" ZXJnb24=:5d6e7f80-1a2b-4c3d-9e8f-0a1b2c3d4e5f ").unwrap(),
            "ZXJnb24=:5d6e7f80-1a2b-4c3d-9e8f-0a1b2c3d4e5f"
        );
    }

    #[test]
    fn test_task_ext_id_rejects_path_syntax() {
        for bad in ["", "  ", "..", "../../vmm/v4.0/content/images", "abc?x=1#frag", "a\\b"] {
            assert!(
                matches!(validate_task_ext_id(bad), Err(ToolError::Validation(_))),
                "accepted {:?}",
                bad
            );
        }
    }
}
