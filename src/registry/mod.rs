//! Registry access.
//!
//! The registry is one JSON document served over HTTP (see [`models`]). It is
//! fetched once per command; nothing is cached on disk.

pub mod models;
pub mod proxy;

pub use models::{InstallationMethod, McpServerDescriptor, MethodType, Registry, ResourceEntry};
pub use proxy::{ProxySettings, should_bypass_proxy};

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::debug;

use crate::core::BwcError;

/// HTTP client bound to one registry URL.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    url: String,
}

fn network_error(operation: &str, reason: impl std::fmt::Display) -> BwcError {
    BwcError::NetworkError {
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

impl RegistryClient {
    /// Client for `url` using the proxy environment of this process.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_proxy(url, ProxySettings::from_env())
    }

    /// Client for `url` with explicit proxy settings.
    pub fn with_proxy(url: &str, proxy: ProxySettings) -> Result<Self> {
        // reqwest's own env handling is replaced so NO_PROXY follows our rules.
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("bwc/", env!("CARGO_PKG_VERSION")))
            .no_proxy();
        if proxy.is_configured() {
            debug!(target: "registry", "Using proxy settings {proxy:?}");
            builder = builder.proxy(reqwest::Proxy::custom(move |target| proxy.proxy_for(target)));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Registry URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_text(&self, url: &str, operation: &str) -> Result<String> {
        debug!(target: "registry", "GET {url}");
        let response = self.client.get(url).send().await.map_err(|e| network_error(operation, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(network_error(operation, format!("HTTP {status} from {url}")).into());
        }
        Ok(response.text().await.map_err(|e| network_error(operation, e))?)
    }

    /// Downloads and parses the registry.
    pub async fn fetch(&self) -> Result<Registry> {
        let body = self.get_text(&self.url, "fetch registry").await?;
        let registry: Registry = serde_json::from_str(&body).map_err(|e| BwcError::ParseError {
            source_name: self.url.clone(),
            reason: e.to_string(),
        })?;
        debug!(
            target: "registry",
            "Registry has {} subagents, {} commands, {} MCP servers",
            registry.subagents.len(),
            registry.commands.len(),
            registry.mcp_servers.len()
        );
        Ok(registry)
    }

    /// Resolves `file` relative to the registry URL.
    pub fn resolve_file_url(&self, file: &str) -> Result<Url> {
        let base = Url::parse(&self.url).with_context(|| format!("Invalid registry URL: {}", self.url))?;
        base.join(file).with_context(|| format!("Invalid resource path: {file}"))
    }

    /// Markdown for a subagent or command: inline content, else the file.
    pub async fn resource_content(&self, entry: &ResourceEntry) -> Result<String> {
        if let Some(content) = &entry.content {
            return Ok(content.clone());
        }
        let file = entry.file.as_deref().ok_or_else(|| BwcError::ParseError {
            source_name: self.url.clone(),
            reason: format!("'{}' has neither content nor file", entry.name),
        })?;
        let url = self.resolve_file_url(file)?;
        self.get_text(url.as_str(), &format!("download {}", entry.name)).await
    }
}
