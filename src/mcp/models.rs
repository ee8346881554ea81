//! Data types for MCP server bookkeeping.
//!
//! [`McpServerConfig`] is BWC's own record of an installed server, stored in the
//! BWC config under `installed.mcpServers`. [`McpJsonFile`] / [`McpJsonEntry`]
//! model the project `.mcp.json` file, a format owned by Claude Code that BWC
//! must match exactly (`type`, never `transport`).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::BwcError;

/// Backend that manages a server's runtime lifecycle.
///
/// Unknown strings are preserved as [`Provider::Other`] so that a hand-edited
/// config still loads; verification reports them as `UnknownProvider`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    /// Docker MCP Toolkit, reached through the gateway
    Docker,
    /// Claude CLI's own process manager
    Claude,
    /// Anything else found on disk
    Other(String),
}

impl Provider {
    /// String form as written to disk.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Docker => "docker",
            Self::Claude => "claude",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Provider {
    fn from(value: String) -> Self {
        match value.as_str() {
            "docker" => Self::Docker,
            "claude" => Self::Claude,
            _ => Self::Other(value),
        }
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire protocol used to reach a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Child process speaking over stdin/stdout
    #[default]
    Stdio,
    /// Server-sent events
    Sse,
    /// Streamable HTTP
    Http,
}

impl Transport {
    /// Lowercase name as used by the Claude CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
            Self::Http => "http",
        }
    }

    /// Whether this transport reaches a URL rather than a child process.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Sse | Self::Http)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            "http" => Ok(Self::Http),
            other => Err(anyhow::anyhow!("Invalid transport '{other}'. Must be one of: stdio, sse, http")),
        }
    }
}

/// Visibility tier of a server registration, mirroring Claude CLI scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// This machine, this project only
    #[default]
    Local,
    /// Every project of this account
    User,
    /// Checked into the project and shared
    Project,
}

impl Scope {
    /// Lowercase name as used by the Claude CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::User => "user",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = BwcError;

    /// Exact match only; `Project` or `global` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "user" => Ok(Self::User),
            "project" => Ok(Self::Project),
            other => Err(BwcError::InvalidScope {
                value: other.to_string(),
            }),
        }
    }
}

/// BWC's record of one installed MCP server.
///
/// Stdio servers carry `command`/`args`/`env`; remote servers carry
/// `url`/`headers`. `installed_at` is set once at install time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerConfig {
    /// Backend owning the runtime
    pub provider: Provider,

    /// Wire protocol
    #[serde(default)]
    pub transport: Transport,

    /// Registration scope
    #[serde(default)]
    pub scope: Scope,

    /// Executable for stdio servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments for stdio servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment for the server process
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Endpoint for sse/http servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// HTTP headers for sse/http servers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Catalog name when it differs from the BWC name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,

    /// RFC 3339 install timestamp
    #[serde(default)]
    pub installed_at: String,
}

impl McpServerConfig {
    /// A stdio server record stamped with the current time.
    #[must_use]
    pub fn stdio(provider: Provider, scope: Scope) -> Self {
        Self {
            provider,
            transport: Transport::Stdio,
            scope,
            command: None,
            args: Vec::new(),
            env: BTreeMap::new(),
            url: None,
            headers: BTreeMap::new(),
            registry_name: None,
            installed_at: Utc::now().to_rfc3339(),
        }
    }

    /// A remote (sse/http) server record stamped with the current time.
    #[must_use]
    pub fn remote(provider: Provider, transport: Transport, scope: Scope, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: Some(url.into()),
            ..Self::stdio(provider, scope)
        }
    }

    /// The record synthesized for a legacy name-only entry.
    #[must_use]
    pub fn legacy_default() -> Self {
        Self::stdio(Provider::Docker, Scope::Local)
    }

    /// Name to look up in provider catalogs: the alias if set, else `name`.
    #[must_use]
    pub fn catalog_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.registry_name.as_deref().unwrap_or(name)
    }

    /// Whether the populated fields agree with the transport.
    ///
    /// Not enforced on load: legacy and hand-edited entries may lack both.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.transport.is_remote() {
            self.url.is_some() && self.command.is_none()
        } else {
            self.url.is_none()
        }
    }
}

/// The project `.mcp.json` file.
///
/// Unknown top-level keys are preserved on rewrite.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct McpJsonFile {
    /// Server name to entry
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, McpJsonEntry>,

    /// Other keys preserved from the original file
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// One server inside `.mcp.json`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpJsonEntry {
    /// The command to execute (stdio servers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments to the command (stdio servers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, Value>>,

    /// Transport (remote servers); Claude Code reads `type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// Server URL (remote servers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// HTTP headers (remote servers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Value>>,

    /// Fields BWC does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
