//! Docker MCP Toolkit commands.
//!
//! On WSL the binary is `docker.exe`; see [`crate::utils::platform::docker_command`].

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::{ProcessOutput, ProcessRunner, command_line};
use crate::core::BwcError;
use crate::utils::platform::docker_command;

/// Handle to the Docker CLI's `mcp` plugin.
pub struct DockerCli {
    runner: Arc<dyn ProcessRunner>,
    binary: String,
}

impl DockerCli {
    /// Uses the platform's Docker binary name.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self::with_binary(runner, docker_command())
    }

    /// Uses an explicit binary name.
    pub fn with_binary(runner: Arc<dyn ProcessRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// Binary name used for every invocation.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn run(&self, args: &[&str]) -> Result<ProcessOutput> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        self.runner.run(&self.binary, &args).await
    }

    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            let argv: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
            Err(BwcError::ProcessFailed {
                command: command_line(&self.binary, &argv),
                stderr: output.stderr,
            }
            .into())
        }
    }

    /// `docker --version`; fails with [`BwcError::PrerequisiteMissing`].
    pub async fn probe(&self) -> Result<()> {
        match self.run(&["--version"]).await {
            Ok(out) if out.success() => {
                debug!(target: "process", "Docker available: {}", out.stdout.trim());
                Ok(())
            }
            _ => Err(BwcError::PrerequisiteMissing {
                tool: self.binary.clone(),
            }
            .into()),
        }
    }

    /// Names of servers enabled in Docker MCP Toolkit.
    pub async fn server_list(&self) -> Result<Vec<String>> {
        let stdout = self.run_checked(&["mcp", "server", "list"]).await?;
        Ok(parse_server_list(&stdout))
    }

    /// `docker mcp server enable <name>`.
    pub async fn server_enable(&self, name: &str) -> Result<ProcessOutput> {
        self.run(&["mcp", "server", "enable", name]).await
    }

    /// `docker mcp server disable <name>`.
    pub async fn server_disable(&self, name: &str) -> Result<ProcessOutput> {
        self.run(&["mcp", "server", "disable", name]).await
    }

    /// Raw `docker mcp catalog show` text.
    pub async fn catalog_show(&self) -> Result<String> {
        self.run_checked(&["mcp", "catalog", "show"]).await
    }

    /// Command line that starts the MCP gateway, as registered with Claude.
    #[must_use]
    pub fn gateway_command(&self) -> Vec<String> {
        vec![self.binary.clone(), "mcp".to_string(), "gateway".to_string(), "run".to_string()]
    }

    /// Printable `enable` command for fix suggestions.
    #[must_use]
    pub fn enable_command(&self, name: &str) -> String {
        format!("{} mcp server enable {name}", self.binary)
    }
}

/// Splits `docker mcp server list` output: a comma (or newline) separated list.
#[must_use]
pub fn parse_server_list(output: &str) -> Vec<String> {
    output
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
