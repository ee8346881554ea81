//! MCP server configuration reconciliation.
//!
//! BWC records every MCP server it installs, but the truth lives elsewhere:
//! Claude Code's `.mcp.json`, the Claude CLI's live registrations and Docker
//! MCP Toolkit. This module keeps those in step:
//!
//! - [`models`]: BWC's server record and the `.mcp.json` shapes
//! - [`mcp_json`]: read-modify-write of `.mcp.json`, with the provider gate
//! - [`catalog`]: best-effort parsing of `docker mcp catalog show`
//! - [`template`]: `claude mcp add` templates from the registry
//! - [`reconciler`]: install and removal across all stores
//! - [`verification`]: read-only drift detection

pub mod catalog;
pub mod mcp_json;
pub mod models;
pub mod reconciler;
pub mod template;
pub mod verification;

pub use mcp_json::{McpJsonStore, should_add_to_mcp_json};
pub use models::{McpServerConfig, Provider, Scope, Transport};
pub use reconciler::{InstallOptions, InstallOutcome, Integration, ProviderReconciler, RemovalOutcome, StoreOutcome};
pub use verification::{ConnectionStatus, VerificationEngine, VerificationResult};

#[cfg(test)]
mod tests;
