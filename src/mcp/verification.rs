//! Drift detection between BWC's bookkeeping and the live systems.
//!
//! Verification is read-only. For each configured server:
//!
//! - `claude` servers must appear in `claude mcp list`
//! - `docker` servers need the `docker-toolkit` gateway registered with Claude
//!   and the server enabled in `docker mcp server list`
//! - any other provider is reported as unknown
//!
//! Each external listing is fetched at most once per run.

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use super::models::{McpServerConfig, Provider, Scope, Transport};
use crate::constants::DOCKER_GATEWAY_NAME;
use crate::core::BwcError;
use crate::process::ExternalProcessGateway;

static LIST_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^\s:]+):\s(?P<endpoint>.*?)(?:\s\((?P<transport>[A-Za-z-]+)\))?\s-\s(?P<status>.+)$").ok()
});

/// Connection health reported by the Claude CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Health check passed
    Connected,
    /// Health check failed
    Error,
    /// Health check timed out
    Timeout,
    /// Not checked or not reported
    Unknown,
}

impl ConnectionStatus {
    /// Classifies the status text after ` - ` in `claude mcp list`.
    #[must_use]
    pub fn from_status_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("connected") && !lower.contains("not connected") && !lower.contains("disconnected") {
            Self::Connected
        } else if lower.contains("fail") || lower.contains("error") || lower.contains('✗') {
            Self::Error
        } else {
            Self::Unknown
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of `claude mcp list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudeListing {
    /// Server name
    pub name: String,
    /// URL or command line
    pub endpoint: String,
    /// Transport label such as `SSE`, if shown
    pub transport: Option<String>,
    /// Status text
    pub status: String,
}

impl ClaudeListing {
    /// Parsed connection status.
    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        ConnectionStatus::from_status_text(&self.status)
    }
}

/// Parses `claude mcp list` output; lines of other shapes are ignored.
#[must_use]
pub fn parse_claude_list(output: &str) -> Vec<ClaudeListing> {
    let Some(re) = LIST_LINE.as_ref() else {
        return Vec::new();
    };
    output
        .lines()
        .filter_map(|line| re.captures(line.trim()))
        .map(|caps| ClaudeListing {
            name: caps["name"].to_string(),
            endpoint: caps["endpoint"].trim().to_string(),
            transport: caps.name("transport").map(|m| m.as_str().to_string()),
            status: caps["status"].trim().to_string(),
        })
        .collect()
}

/// Outcome of verifying one configured server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Server name
    pub name: String,
    /// Recorded provider
    pub provider: Provider,
    /// Recorded transport
    pub transport: Transport,
    /// Recorded scope
    pub scope: Scope,
    /// Always true: results come from BWC's own config
    #[serde(rename = "configuredInBWC")]
    pub configured_in_bwc: bool,
    /// Whether the live system knows the server
    pub actually_installed: bool,
    /// Live health
    pub connection_status: ConnectionStatus,
    /// Why the server is not installed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_error: Option<String>,
    /// Suggested remediation, never run automatically
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fix_commands: Vec<String>,
}

impl VerificationResult {
    fn new(name: &str, config: &McpServerConfig) -> Self {
        Self {
            name: name.to_string(),
            provider: config.provider.clone(),
            transport: config.transport,
            scope: config.scope,
            configured_in_bwc: true,
            actually_installed: false,
            connection_status: ConnectionStatus::Unknown,
            verification_error: None,
            fix_commands: Vec::new(),
        }
    }

    fn installed(mut self, status: ConnectionStatus) -> Self {
        self.actually_installed = true;
        self.connection_status = status;
        self
    }

    fn missing(mut self, error: impl Into<String>, fix_commands: Vec<String>) -> Self {
        self.actually_installed = false;
        self.verification_error = Some(error.into());
        self.fix_commands = fix_commands;
        self
    }
}

/// Re-add command for a `claude` server.
#[must_use]
pub fn claude_fix_command(name: &str, config: &McpServerConfig) -> String {
    match (&config.url, config.transport.is_remote()) {
        (Some(url), true) => format!(
            "bwc add --mcp {name} --transport {} --url {url} --scope {}",
            config.transport, config.scope
        ),
        _ => format!("bwc add --mcp {name}"),
    }
}

/// Remediation when the Docker gateway is not registered.
#[must_use]
pub fn docker_gateway_fix_commands(enable_command: String) -> Vec<String> {
    vec![
        "bwc add --setup".to_string(),
        "# Restart Claude Code to load the Docker MCP gateway".to_string(),
        enable_command,
    ]
}

/// Cached live state for one verification run.
#[derive(Default)]
struct LiveState {
    claude: Option<std::result::Result<Vec<ClaudeListing>, String>>,
    docker: Option<std::result::Result<Vec<String>, String>>,
}

/// Read-only verifier over the external tools.
pub struct VerificationEngine<'a> {
    gateway: &'a ExternalProcessGateway,
}

impl<'a> VerificationEngine<'a> {
    /// Verifier using `gateway` for every external query.
    pub const fn new(gateway: &'a ExternalProcessGateway) -> Self {
        Self {
            gateway,
        }
    }

    async fn claude_listing(&self, state: &mut LiveState) -> std::result::Result<Vec<ClaudeListing>, String> {
        if let Some(cached) = &state.claude {
            return cached.clone();
        }
        let result = match self.gateway.claude().mcp_list().await {
            Ok(out) if out.success() => Ok(parse_claude_list(&out.stdout)),
            Ok(out) => Err(format!("'claude mcp list' failed: {}", out.stderr.trim())),
            Err(e) => Err(e.to_string()),
        };
        debug!(target: "mcp", "Claude listing: {result:?}");
        state.claude = Some(result.clone());
        result
    }

    async fn docker_servers(&self, state: &mut LiveState) -> std::result::Result<Vec<String>, String> {
        if let Some(cached) = &state.docker {
            return cached.clone();
        }
        let result = self.gateway.docker().server_list().await.map_err(|e| e.to_string());
        debug!(target: "mcp", "Docker servers: {result:?}");
        state.docker = Some(result.clone());
        result
    }

    /// Verifies every entry in `configs`, in name order.
    pub async fn verify_all(&self, configs: &BTreeMap<String, McpServerConfig>) -> Result<Vec<VerificationResult>> {
        let mut state = LiveState::default();
        let mut results = Vec::with_capacity(configs.len());
        for (name, config) in configs {
            results.push(self.verify_one(name, config, &mut state).await);
        }
        Ok(results)
    }

    async fn verify_one(&self, name: &str, config: &McpServerConfig, state: &mut LiveState) -> VerificationResult {
        let result = VerificationResult::new(name, config);
        match &config.provider {
            Provider::Claude => match self.claude_listing(state).await {
                Ok(listing) => match listing.iter().find(|l| l.name == name && l.name != DOCKER_GATEWAY_NAME) {
                    Some(entry) => result.installed(entry.connection_status()),
                    None => result.missing(
                        format!("'{name}' is not registered with the Claude CLI"),
                        vec![claude_fix_command(name, config)],
                    ),
                },
                Err(reason) => result.missing(reason, vec!["npm install -g @anthropic-ai/claude-code".to_string()]),
            },
            Provider::Docker => {
                let catalog_name = config.catalog_name(name);
                let enable = self.gateway.docker().enable_command(catalog_name);
                let gateway = match self.claude_listing(state).await {
                    Ok(listing) => listing.into_iter().find(|l| l.name == DOCKER_GATEWAY_NAME),
                    Err(reason) => {
                        return result.missing(reason, vec!["npm install -g @anthropic-ai/claude-code".to_string()]);
                    }
                };
                let Some(gateway) = gateway else {
                    return result.missing(
                        "Docker MCP gateway is not registered with Claude Code",
                        docker_gateway_fix_commands(enable),
                    );
                };
                match self.docker_servers(state).await {
                    Ok(enabled) if enabled.iter().any(|s| s == name || s == catalog_name) => {
                        result.installed(gateway.connection_status())
                    }
                    Ok(_) => result.missing(format!("'{catalog_name}' is not enabled in Docker MCP Toolkit"), vec![enable]),
                    Err(reason) => result.missing(reason, vec![format!("{} --version", self.gateway.docker().binary())]),
                }
            }
            Provider::Other(other) => {
                let error = BwcError::UnknownProvider {
                    provider: other.clone(),
                };
                result.missing(
                    error.to_string(),
                    vec![format!("bwc remove --mcp {name} --yes"), format!("bwc add --mcp {name}")],
                )
            }
        }
    }
}
