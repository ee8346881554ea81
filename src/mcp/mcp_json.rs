//! The project `.mcp.json` store.
//!
//! `.mcp.json` belongs to Claude Code, not BWC, so entries are written in its
//! exact shape: stdio servers as `command`/`args`/`env`, remote servers as
//! `type`/`url`/`headers`/`env`. Keys BWC does not know are preserved.
//!
//! Only project-scoped, non-Docker servers are written here (see
//! [`should_add_to_mcp_json`]). Docker servers are reached through the gateway
//! and never appear in this file.

use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::models::{McpJsonEntry, McpJsonFile, McpServerConfig, Provider, Scope};
use crate::constants::MCP_JSON_FILE;
use crate::core::BwcError;
use crate::utils::fs::{read_optional_text, write_json_file};

/// Whether `config` belongs in `.mcp.json`: project scope and not Docker.
#[must_use]
pub fn should_add_to_mcp_json(config: &McpServerConfig) -> bool {
    config.scope == Scope::Project && config.provider != Provider::Docker
}

/// Renders one `--env` value for `.mcp.json`.
///
/// `$VAR` references pass through; literals become `${KEY:-literal}` so a real
/// environment variable overrides the shipped default.
#[must_use]
pub fn template_env_value(key: &str, value: &str) -> String {
    if value.starts_with('$') {
        value.to_string()
    } else {
        format!("${{{key}:-{value}}}")
    }
}

/// Splits `KEY=value` assignments, skipping malformed ones.
#[must_use]
pub fn parse_env_assignments(assignments: &[String]) -> Vec<(String, String)> {
    assignments
        .iter()
        .filter_map(|raw| match raw.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Some((key.trim().to_string(), value.to_string()))
            }
            _ => {
                warn!(target: "mcp", "Ignoring malformed environment assignment '{raw}' (expected KEY=VALUE)");
                None
            }
        })
        .collect()
}

/// Builds the `.mcp.json` entry for `name`.
///
/// `config_example` is the registry's JSON example, either a whole
/// `{"mcpServers": {...}}` document or a bare entry. When it is missing or not
/// JSON the entry is built from `config` alone.
pub fn build_entry(
    name: &str,
    config: &McpServerConfig,
    config_example: Option<&str>,
    env_vars: &[String],
) -> Result<McpJsonEntry> {
    let mut entry = config_example
        .and_then(|text| example_entry(name, text))
        .map(serde_json::from_value::<McpJsonEntry>)
        .transpose()?
        .unwrap_or_default();

    if entry.command.is_none() && entry.url.is_none() {
        if config.transport.is_remote() {
            entry.url.clone_from(&config.url);
        } else {
            entry.command.clone_from(&config.command);
            entry.args.clone_from(&config.args);
        }
    }

    if config.transport.is_remote() {
        entry.r#type.get_or_insert_with(|| config.transport.to_string());
        if !config.headers.is_empty() {
            let headers = entry.headers.get_or_insert_with(BTreeMap::new);
            for (k, v) in &config.headers {
                headers.insert(k.clone(), Value::String(v.clone()));
            }
        }
    }

    let mut env = entry.env.take().unwrap_or_default();
    for (k, v) in &config.env {
        env.entry(k.clone()).or_insert_with(|| Value::String(v.clone()));
    }
    for (key, value) in parse_env_assignments(env_vars) {
        let templated = template_env_value(&key, &value);
        env.insert(key, Value::String(templated));
    }
    entry.env = (!env.is_empty()).then_some(env);

    Ok(entry)
}

/// Extracts a single server object from a registry example.
fn example_entry(name: &str, text: &str) -> Option<Value> {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            debug!(target: "mcp", "Config example for '{name}' is not JSON: {e}");
            return None;
        }
    };

    let mut object = match parsed {
        Value::Object(map) => map,
        _ => return None,
    };

    if let Some(Value::Object(servers)) = object.remove("mcpServers") {
        let mut servers = servers;
        object = match servers.remove(name) {
            Some(Value::Object(entry)) => entry,
            _ => servers.into_iter().find_map(|(_, v)| match v {
                Value::Object(entry) => Some(entry),
                _ => None,
            })?,
        };
    }

    rename_transport(&mut object);
    Some(Value::Object(object))
}

/// `transport` becomes `type` for remote entries and is dropped for stdio.
fn rename_transport(object: &mut Map<String, Value>) {
    if let Some(transport) = object.remove("transport")
        && transport.as_str() != Some("stdio")
        && !object.contains_key("type")
    {
        object.insert("type".to_string(), transport);
    }
}

/// Reads and writes one `.mcp.json` file.
#[derive(Debug, Clone)]
pub struct McpJsonStore {
    path: PathBuf,
}

impl McpJsonStore {
    /// The `.mcp.json` in `project_root`.
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: project_root.join(MCP_JSON_FILE),
        }
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the file; `None` if it does not exist.
    ///
    /// Malformed JSON is a [`BwcError::ParseError`], never silently replaced.
    pub async fn read(&self) -> Result<Option<McpJsonFile>> {
        let Some(content) = read_optional_text(&self.path).await? else {
            return Ok(None);
        };

        let file = serde_json::from_str(&content).map_err(|e| BwcError::ParseError {
            source_name: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(file))
    }

    /// Overwrites the file with `file`.
    pub async fn write(&self, file: &McpJsonFile) -> Result<()> {
        write_json_file(&self.path, file, true).await
    }

    /// Merges one server into the file, creating it if needed.
    pub async fn add_server(
        &self,
        name: &str,
        config: &McpServerConfig,
        config_example: Option<&str>,
        env_vars: &[String],
    ) -> Result<McpJsonEntry> {
        let entry = build_entry(name, config, config_example, env_vars)?;

        let mut file = self.read().await?.unwrap_or_default();
        file.mcp_servers.insert(name.to_string(), entry.clone());
        self.write(&file).await?;

        debug!(target: "mcp", "Added '{name}' to {}", self.path.display());
        Ok(entry)
    }

    /// Deletes one server; returns whether it was present.
    ///
    /// A missing file is `Ok(false)`.
    pub async fn remove_server(&self, name: &str) -> Result<bool> {
        let Some(mut file) = self.read().await? else {
            return Ok(false);
        };

        if file.mcp_servers.remove(name).is_none() {
            return Ok(false);
        }

        self.write(&file).await?;
        debug!(target: "mcp", "Removed '{name}' from {}", self.path.display());
        Ok(true)
    }
}
