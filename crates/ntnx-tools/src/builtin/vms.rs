//! VM creation tool

use async_trait::async_trait;
use ntnx_client::{
    CdRom, ClusterReference, Vm, VmSourceReference, VmSourceReferenceEntityType, VmmClient,
};
use ntnx_core::PrismConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ToolError;
use crate::response::ToolOutput;
use crate::tool::{parse_args, SecurityLevel, Tool};

/// Smallest VM the backend accepts (64 MiB)
pub const MIN_MEMORY_GB: f64 = 0.064;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a memory size in GB to bytes, enforcing the minimum
pub fn memory_bytes(memory_size_gb: f64) -> Result<u64, ToolError> {
    if !memory_size_gb.is_finite() || memory_size_gb < MIN_MEMORY_GB {
        return Err(ToolError::validation(format!(
            "Memory size must be at least {} GB (64MB). Provided: {} GB",
            MIN_MEMORY_GB, memory_size_gb
        )));
    }
    Ok((memory_size_gb * BYTES_PER_GB).round() as u64)
}

#[derive(Debug, Deserialize)]
struct CreateVmArgs {
    name: String,
    #[serde(default)]
    description: Option<String>,
    num_sockets: u32,
    num_cores_per_socket: u32,
    memory_size_gb: f64,
}

/// Tool to create an AHV VM on the configured cluster
pub struct CreateVmTool {
    config: Arc<PrismConfig>,
}

impl CreateVmTool {
    pub fn new(config: Arc<PrismConfig>) -> Self {
        Self { config }
    }

    fn build_vm(args: CreateVmArgs, cluster_ext_id: &str) -> Result<Vm, ToolError> {
        if args.name.trim().is_empty() {
            return Err(ToolError::validation("VM name must not be empty"));
        }
        if args.num_sockets == 0 {
            return Err(ToolError::validation("num_sockets must be at least 1"));
        }
        if args.num_cores_per_socket == 0 {
            return Err(ToolError::validation("num_cores_per_socket must be at least 1"));
        }
        let memory_size_bytes = memory_bytes(args.memory_size_gb)?;

        Ok(Vm {
            name: args.name,
            description: args.description.filter(|d| !d.is_empty()),
            cluster: ClusterReference {
                ext_id: cluster_ext_id.to_string(),
            },
            num_sockets: args.num_sockets,
            num_cores_per_socket: args.num_cores_per_socket,
            memory_size_bytes,
            source: VmSourceReference {
                entity_type: VmSourceReferenceEntityType::Vm,
                ext_id: Uuid::new_v4().to_string(),
            },
            cd_roms: vec![CdRom::empty_ide()],
        })
    }
}

#[async_trait]
impl Tool for CreateVmTool {
    fn name(&self) -> &str {
        "create_vm"
    }

    fn description(&self) -> &str {
        "Create an AHV virtual machine on the configured cluster with the given CPU topology and memory. Adds one empty IDE CD-ROM. Returns the task id to track creation."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "VM name"
                },
                "description": {
                    "type": "string",
                    "description": "VM description"
                },
                "num_sockets": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of CPU sockets"
                },
                "num_cores_per_socket": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Cores per socket"
                },
                "memory_size_gb": {
                    "type": "number",
                    "minimum": MIN_MEMORY_GB,
                    "description": "Memory in GB, fractions allowed (minimum 0.064)"
                }
            },
            "required": ["name", "num_sockets", "num_cores_per_socket", "memory_size_gb"]
        })
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::Modify
    }

    fn category(&self) -> &str {
        "vms"
    }

    fn tags(&self) -> Vec<String> {
        vec!["vm".into(), "ahv".into(), "vmm".into(), "create".into()]
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        const CONTEXT: &str = "Failed to create VM";
        self.config.ensure_complete()?;

        let cluster_ext_id = self.config.cluster_ext_id()?;
        let vm = Self::build_vm(parse_args(input)?, cluster_ext_id)?;

        let (client, _) =
            VmmClient::resolve(&self.config).map_err(|e| ToolError::backend(CONTEXT, e))?;
        let response = client
            .create_vm(&vm)
            .await
            .map_err(|e| ToolError::backend(CONTEXT, e))?;

        let task = response
            .data
            .ok_or_else(|| ToolError::no_data(format!("{}: Invalid response", CONTEXT)))?;
        info!(name = %vm.name, task = ?task.ext_id, "VM creation initiated");

        Ok(ToolOutput::new("VM creation initiated").with("task_ext_id", json!(task.ext_id)))
    }
}
