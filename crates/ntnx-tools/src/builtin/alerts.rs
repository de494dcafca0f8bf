//! Alert listing tool

use async_trait::async_trait;
use ntnx_client::MonitoringClient;
use ntnx_core::PrismConfig;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ToolError;
use crate::response::ToolOutput;
use crate::tool::Tool;

const ALERTS_PAGE: u32 = 0;
const ALERTS_LIMIT: u32 = 10;

/// Tool to list the most recent alerts, as returned by the backend
pub struct GetAlertsTool {
    config: Arc<PrismConfig>,
}

impl GetAlertsTool {
    pub fn new(config: Arc<PrismConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for GetAlertsTool {
    fn name(&self) -> &str {
        "get_alerts"
    }

    fn description(&self) -> &str {
        "Get the first 10 alerts from Prism Central as raw alert records."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    fn category(&self) -> &str {
        "alerts"
    }

    fn tags(&self) -> Vec<String> {
        vec!["alerts".into(), "monitoring".into(), "list".into()]
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput, ToolError> {
        const CONTEXT: &str = "Failed to retrieve alerts";
        self.config.ensure_complete()?;

        let (client, _) =
            MonitoringClient::resolve(&self.config).map_err(|e| ToolError::backend(CONTEXT, e))?;
        let response = client
            .list_alerts(ALERTS_PAGE, ALERTS_LIMIT)
            .await
            .map_err(|e| ToolError::backend(CONTEXT, e))?;

        let alerts = response
            .data
            .ok_or_else(|| ToolError::no_data("Invalid response from alerts API"))?;

        Ok(ToolOutput::new("Alerts retrieved").with("alerts", Value::Array(alerts)))
    }
}
