//! The BWC config file format.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "registry": "https://buildwithclaude.com/registry.json",
//!   "paths": { "subagents": "~/.claude/agents", "commands": "~/.claude/commands" },
//!   "installed": {
//!     "subagents": ["code-reviewer"],
//!     "commands": ["commit"],
//!     "mcpServers": { "postgres": { "provider": "docker", ... } }
//!   }
//! }
//! ```
//!
//! `installed.mcpServers` has two on-disk shapes. Older releases wrote a bare
//! list of names; current releases write a name-to-config mapping. Both are
//! accepted on read and every accessor here handles both. Only
//! [`BwcConfig::migrate_mcp_servers`] or a mutation converts a legacy list into
//! the mapping, and nothing reaches disk until the owner saves.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{CONFIG_VERSION, DEFAULT_REGISTRY_URL};
use crate::mcp::models::McpServerConfig;

/// Root of a BWC config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BwcConfig {
    /// Format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Registry URL
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Install directories for markdown resources
    #[serde(default)]
    pub paths: ResourcePaths,

    /// Installed resource bookkeeping
    #[serde(default)]
    pub installed: Installed,

    /// Unknown top-level keys, preserved on save
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_registry() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

/// Where subagent and command markdown files are written.
///
/// Values may start with `~`; relative values are resolved against the
/// project root (project configs) or the home directory (global config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePaths {
    /// Subagent directory
    pub subagents: String,
    /// Slash command directory
    pub commands: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            subagents: "~/.claude/agents".to_string(),
            commands: "~/.claude/commands".to_string(),
        }
    }
}

/// Installed resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Installed {
    /// Subagent names
    #[serde(default)]
    pub subagents: Vec<String>,

    /// Command names
    #[serde(default)]
    pub commands: Vec<String>,

    /// MCP servers, legacy list or current mapping
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: InstalledMcpServers,
}

/// The two on-disk shapes of `installed.mcpServers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstalledMcpServers {
    /// Names only, written by older releases
    Legacy(Vec<String>),
    /// Name to full record
    Current(BTreeMap<String, McpServerConfig>),
}

impl Default for InstalledMcpServers {
    fn default() -> Self {
        Self::Current(BTreeMap::new())
    }
}

impl InstalledMcpServers {
    /// Whether this is the legacy name list.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Converts to the mapping in place, synthesizing records for legacy names.
    ///
    /// Returns the mapping for further mutation.
    pub fn to_current(&mut self) -> &mut BTreeMap<String, McpServerConfig> {
        if let Self::Legacy(names) = self {
            let map = names
                .iter()
                .map(|name| (name.clone(), McpServerConfig::legacy_default()))
                .collect();
            *self = Self::Current(map);
        }
        match self {
            Self::Current(map) => map,
            Self::Legacy(_) => unreachable!("legacy list converted above"),
        }
    }
}

impl BwcConfig {
    /// Fresh config for the global tier.
    #[must_use]
    pub fn new_global() -> Self {
        Self {
            version: default_version(),
            registry: default_registry(),
            paths: ResourcePaths::default(),
            installed: Installed::default(),
            other: BTreeMap::new(),
        }
    }

    /// Fresh config for a project; paths are relative to the project root.
    #[must_use]
    pub fn new_project() -> Self {
        Self {
            paths: ResourcePaths {
                subagents: ".claude/agents".to_string(),
                commands: ".claude/commands".to_string(),
            },
            ..Self::new_global()
        }
    }

    /// Upgrades a legacy `mcpServers` list to the mapping, in memory only.
    ///
    /// Returns whether anything changed.
    pub fn migrate_mcp_servers(&mut self) -> bool {
        if self.installed.mcp_servers.is_legacy() {
            self.installed.mcp_servers.to_current();
            true
        } else {
            false
        }
    }

    /// Records (or replaces) an MCP server.
    pub fn add_installed_mcp_server(&mut self, name: &str, config: McpServerConfig) {
        self.installed.mcp_servers.to_current().insert(name.to_string(), config);
    }

    /// Forgets an MCP server. Absent names are a no-op.
    ///
    /// Returns whether the name was present.
    pub fn remove_installed_mcp_server(&mut self, name: &str) -> bool {
        match &mut self.installed.mcp_servers {
            InstalledMcpServers::Legacy(names) => {
                let before = names.len();
                names.retain(|n| n != name);
                names.len() != before
            }
            InstalledMcpServers::Current(map) => map.remove(name).is_some(),
        }
    }

    /// Installed MCP server names.
    #[must_use]
    pub fn get_installed_mcp_servers(&self) -> Vec<String> {
        match &self.installed.mcp_servers {
            InstalledMcpServers::Legacy(names) => names.clone(),
            InstalledMcpServers::Current(map) => map.keys().cloned().collect(),
        }
    }

    /// Record for one server; legacy names get a synthesized docker record.
    #[must_use]
    pub fn get_mcp_server_config(&self, name: &str) -> Option<McpServerConfig> {
        match &self.installed.mcp_servers {
            InstalledMcpServers::Legacy(names) => {
                names.iter().any(|n| n == name).then(McpServerConfig::legacy_default)
            }
            InstalledMcpServers::Current(map) => map.get(name).cloned(),
        }
    }

    /// Every server record, synthesizing for legacy names.
    #[must_use]
    pub fn get_all_mcp_server_configs(&self) -> BTreeMap<String, McpServerConfig> {
        match &self.installed.mcp_servers {
            InstalledMcpServers::Legacy(names) => names
                .iter()
                .map(|n| (n.clone(), McpServerConfig::legacy_default()))
                .collect(),
            InstalledMcpServers::Current(map) => map.clone(),
        }
    }

    /// Records a subagent name once.
    pub fn add_installed_subagent(&mut self, name: &str) {
        push_unique(&mut self.installed.subagents, name);
    }

    /// Forgets a subagent name.
    pub fn remove_installed_subagent(&mut self, name: &str) -> bool {
        remove_name(&mut self.installed.subagents, name)
    }

    /// Records a command name once.
    pub fn add_installed_command(&mut self, name: &str) {
        push_unique(&mut self.installed.commands, name);
    }

    /// Forgets a command name.
    pub fn remove_installed_command(&mut self, name: &str) -> bool {
        remove_name(&mut self.installed.commands, name)
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

fn remove_name(list: &mut Vec<String>, name: &str) -> bool {
    let before = list.len();
    list.retain(|n| n != name);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::models::{Provider, Scope, Transport};
    use serde_json::json;

    fn legacy_config() -> BwcConfig {
        serde_json::from_value(json!({
            "version": "1.0",
            "registry": "https://example.com/registry.json",
            "paths": {"subagents": "~/.claude/agents", "commands": "~/.claude/commands"},
            "installed": {"subagents": [], "commands": [], "mcpServers": ["a", "b"]}
        }))
        .unwrap()
    }

    #[test]
    fn test_legacy_accessors() {
        let config = legacy_config();
        assert!(config.installed.mcp_servers.is_legacy());
        assert_eq!(config.get_installed_mcp_servers(), vec!["a", "b"]);

        let a = config.get_mcp_server_config("a").unwrap();
        assert_eq!(a.provider, Provider::Docker);
        assert_eq!(a.transport, Transport::Stdio);
        assert_eq!(a.scope, Scope::Local);
        assert!(!a.installed_at.is_empty());

        assert!(config.get_mcp_server_config("zzz").is_none());
        assert_eq!(config.get_all_mcp_server_configs().len(), 2);
    }

    #[test]
    fn test_add_converts_legacy_to_mapping() {
        let mut config = legacy_config();
        let c = McpServerConfig::stdio(Provider::Claude, Scope::Project);

        config.add_installed_mcp_server("c", c.clone());

        match &config.installed.mcp_servers {
            InstalledMcpServers::Current(map) => {
                assert_eq!(map.len(), 3);
                assert_eq!(map["a"].provider, Provider::Docker);
                assert_eq!(map["b"].provider, Provider::Docker);
                assert_eq!(map["c"], c);
            }
            InstalledMcpServers::Legacy(_) => panic!("expected mapping form"),
        }
    }

    #[test]
    fn test_remove_is_idempotent_for_both_shapes() {
        let mut legacy = legacy_config();
        let snapshot = legacy.clone();
        assert!(!legacy.remove_installed_mcp_server("missing"));
        assert_eq!(legacy, snapshot);

        assert!(legacy.remove_installed_mcp_server("a"));
        assert!(legacy.installed.mcp_servers.is_legacy());
        assert_eq!(legacy.get_installed_mcp_servers(), vec!["b"]);

        let mut current = BwcConfig::new_global();
        current.add_installed_mcp_server("x", McpServerConfig::legacy_default());
        let snapshot = current.clone();
        assert!(!current.remove_installed_mcp_server("missing"));
        assert_eq!(current, snapshot);
        assert!(current.remove_installed_mcp_server("x"));
        assert!(current.get_installed_mcp_servers().is_empty());
    }

    #[test]
    fn test_migrate_only_touches_legacy() {
        let mut config = legacy_config();
        assert!(config.migrate_mcp_servers());
        assert!(!config.installed.mcp_servers.is_legacy());
        assert!(!config.migrate_mcp_servers());
    }

    #[test]
    fn test_serializes_mapping_form_only() {
        let mut config = legacy_config();
        config.migrate_mcp_servers();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["installed"]["mcpServers"].is_object());
        assert_eq!(value["installed"]["mcpServers"]["a"]["provider"], "docker");
    }

    #[test]
    fn test_missing_sections_use_defaults_and_unknown_keys_survive() {
        let config: BwcConfig = serde_json::from_value(json!({"theme": "dark"})).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.registry, DEFAULT_REGISTRY_URL);
        assert!(config.get_installed_mcp_servers().is_empty());
        assert_eq!(config.other["theme"], "dark");
    }

    #[test]
    fn test_subagent_and_command_bookkeeping() {
        let mut config = BwcConfig::new_project();
        config.add_installed_subagent("reviewer");
        config.add_installed_subagent("reviewer");
        assert_eq!(config.installed.subagents, vec!["reviewer"]);
        assert!(config.remove_installed_subagent("reviewer"));
        assert!(!config.remove_installed_subagent("reviewer"));

        config.add_installed_command("commit");
        assert!(config.remove_installed_command("commit"));
        assert_eq!(config.paths.subagents, ".claude/agents");
    }
}
