//! BWC - Build With Claude
//!
//! Installs Claude Code subagents, slash commands and MCP servers from the
//! Build With Claude registry, and keeps BWC's own records of installed MCP
//! servers in step with the tools that actually run them: the Claude CLI and
//! Docker MCP Toolkit.
//!
//! # Architecture Overview
//!
//! BWC records what it installed in a JSON config (global `~/.bwc/config.json`
//! or a project `bwc.config.json`). Every MCP install or removal touches up to
//! three places:
//!
//! - the BWC config ([`config::ConfigStore`])
//! - the project's shared `.mcp.json` ([`mcp::McpJsonStore`])
//! - the live registration held by the Claude CLI or Docker
//!   ([`process::ExternalProcessGateway`])
//!
//! [`mcp::ProviderReconciler`] drives installs and removals across them, and
//! [`mcp::VerificationEngine`] reports drift between the config and the live
//! state together with commands that fix it.
//!
//! # Modules
//!
//! - [`cli`] - `init`, `add`, `remove` and `list`
//! - [`config`] - config locations, the on-disk model and the store
//! - [`core`] - error types and user-facing error formatting
//! - [`mcp`] - MCP records, `.mcp.json`, catalog parsing, reconciliation and verification
//! - [`process`] - the process boundary and the Claude/Docker CLIs built on it
//! - [`registry`] - registry download and proxy handling
//! - [`utils`] - file system, platform and progress helpers
//!
//! # Example
//!
//! ```bash
//! bwc init --project
//! bwc add --mcp postgres --source docker
//! bwc add --mcp linear --transport sse --url https://mcp.linear.app/sse --scope project
//! bwc list --verify
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod mcp;
pub mod process;
pub mod registry;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
