//! Registry document types.
//!
//! The registry is a single JSON document:
//!
//! ```json
//! {
//!   "subagents": [{"name": "code-reviewer", "description": "...", "content": "---\n..."}],
//!   "commands":  [{"name": "commit", "file": "commands/commit.md"}],
//!   "mcpServers": [{
//!     "name": "postgres",
//!     "sources": {"docker": "mcp/postgres"},
//!     "installationMethods": [{"type": "docker", "recommended": true}]
//!   }]
//! }
//! ```
//!
//! Unknown fields are ignored so newer registries keep working.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::BwcError;
use crate::mcp::models::Transport;

/// The whole registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// Subagents
    #[serde(default)]
    pub subagents: Vec<ResourceEntry>,
    /// Slash commands
    #[serde(default)]
    pub commands: Vec<ResourceEntry>,
    /// MCP servers
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: Vec<McpServerDescriptor>,
}

/// A markdown resource (subagent or command).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Name, also the installed file stem
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Inline markdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Path relative to the registry URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Where a server's artifacts live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpSources {
    /// Docker image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<String>,
    /// npm package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,
}

/// Kinds of installation method a registry entry can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodType {
    /// Docker MCP Toolkit
    Docker,
    /// npm / npx
    Npm,
    /// Operator follows written steps
    Manual,
    /// Let BWC pick among the other methods
    Bwc,
    /// A `claude mcp add` template
    ClaudeCli,
    /// Anything newer than this release understands
    #[serde(other)]
    Unknown,
}

impl MethodType {
    /// Name as written in the registry and accepted by `--source`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Npm => "npm",
            Self::Manual => "manual",
            Self::Bwc => "bwc",
            Self::ClaudeCli => "claude-cli",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this method installs something itself.
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        matches!(self, Self::Docker | Self::Npm | Self::Manual)
    }
}

impl std::fmt::Display for MethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MethodType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docker" => Ok(Self::Docker),
            "npm" => Ok(Self::Npm),
            "manual" => Ok(Self::Manual),
            "bwc" => Ok(Self::Bwc),
            other => Err(anyhow::anyhow!("Invalid source '{other}'. Must be one of: docker, npm, manual, bwc")),
        }
    }
}

/// One way of installing a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationMethod {
    /// Method kind
    #[serde(rename = "type")]
    pub method_type: MethodType,
    /// Shell command (template for `claude-cli`, install command for npm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Example client configuration, as a JSON string or object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_example: Option<Value>,
    /// Manual steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    /// Prerequisites
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    /// Preferred by the registry
    #[serde(default)]
    pub recommended: bool,
}

impl InstallationMethod {
    /// The config example as text, whichever form the registry used.
    #[must_use]
    pub fn config_example_text(&self) -> Option<String> {
        match self.config_example.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => serde_json::to_string(other).ok(),
        }
    }
}

/// A server offered by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerDescriptor {
    /// Name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Declared transport (`stdio`, `sse`, `http`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    /// Endpoint for remote servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Name in the provider's catalog, when different
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,
    /// Artifact locations
    #[serde(default)]
    pub sources: McpSources,
    /// Installation methods
    #[serde(default)]
    pub installation_methods: Vec<InstallationMethod>,
}

impl McpServerDescriptor {
    /// A descriptor with only a name; used when installing from flags alone.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            category: None,
            transport: None,
            url: None,
            registry_name: None,
            sources: McpSources::default(),
            installation_methods: Vec::new(),
        }
    }

    /// Declared transport, if it is one BWC understands.
    #[must_use]
    pub fn transport(&self) -> Option<Transport> {
        self.transport.as_deref().and_then(|t| t.parse().ok())
    }

    /// First method of the given kind.
    #[must_use]
    pub fn method(&self, kind: MethodType) -> Option<&InstallationMethod> {
        self.installation_methods.iter().find(|m| m.method_type == kind)
    }

    /// The `claude mcp add` template, if declared.
    #[must_use]
    pub fn claude_cli_template(&self) -> Option<&str> {
        self.method(MethodType::ClaudeCli).and_then(|m| m.command.as_deref())
    }

    /// First config example found on any method, preferring `preferred`.
    #[must_use]
    pub fn config_example(&self, preferred: MethodType) -> Option<String> {
        self.method(preferred)
            .and_then(InstallationMethod::config_example_text)
            .or_else(|| self.installation_methods.iter().find_map(InstallationMethod::config_example_text))
    }
}

/// Closest names to `name` among `candidates`, best first.
#[must_use]
pub fn suggest_names<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    let needle = name.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|c| {
            let lower = c.to_lowercase();
            let mut score = strsim::jaro_winkler(&needle, &lower);
            if lower.contains(&needle) || needle.contains(&lower) {
                score = score.max(0.9);
            }
            (score, c)
        })
        .filter(|(score, _)| *score >= 0.8)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(3).map(|(_, c)| c.to_string()).collect()
}

impl Registry {
    /// Looks up an MCP server, suggesting near misses.
    pub fn find_mcp_server(&self, name: &str) -> Result<&McpServerDescriptor, BwcError> {
        self.mcp_servers.iter().find(|s| s.name == name).ok_or_else(|| BwcError::ServerNotFound {
            name: name.to_string(),
            suggestions: suggest_names(name, self.mcp_servers.iter().map(|s| s.name.as_str())),
        })
    }

    /// Looks up a subagent.
    pub fn find_subagent(&self, name: &str) -> Result<&ResourceEntry, BwcError> {
        self.subagents.iter().find(|s| s.name == name).ok_or_else(|| BwcError::ResourceNotFound {
            resource_type: "Subagent".to_string(),
            name: name.to_string(),
        })
    }

    /// Looks up a command.
    pub fn find_command(&self, name: &str) -> Result<&ResourceEntry, BwcError> {
        self.commands.iter().find(|s| s.name == name).ok_or_else(|| BwcError::ResourceNotFound {
            resource_type: "Command".to_string(),
            name: name.to_string(),
        })
    }
}
