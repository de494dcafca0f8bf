//! Native Prism Central v4 API Client
//!
//! Typed access to the handful of Prism Central endpoints the MCP tools use.
//! One client per product area:
//!
//! - [`VmmClient`]: images and AHV virtual machines
//! - [`MonitoringClient`]: alerts and cluster log collection
//! - [`PrismClient`]: asynchronous task tracking
//!
//! Every client is built from a [`ntnx_core::BackendConfiguration`] and owns its
//! own HTTP connection; nothing is pooled across tool calls.

pub mod client;
pub mod error;
pub mod models;
pub mod monitoring;
pub mod prism;
pub mod vmm;

pub use client::{ApiClient, REQUEST_ID_HEADER};
pub use error::ApiError;
pub use models::*;
pub use monitoring::MonitoringClient;
pub use prism::PrismClient;
pub use vmm::VmmClient;
