//! The config store: loading, caching and persisting one BWC config.
//!
//! A [`ConfigStore`] is constructed by the caller and passed where it is
//! needed. It loads lazily, caches the effective config for its own lifetime
//! and always saves back to the file it loaded from.
//!
//! # Resolution order
//!
//! 1. Unless `force_user` is set, search upward from the working directory
//!    for `bwc.config.json` or `.bwc/config.json` (a project config).
//! 2. Otherwise the global config (`BWC_CONFIG_PATH` or `~/.bwc/config.json`).
//! 3. Neither exists: [`BwcError::ConfigNotFound`].
//!
//! There is no file locking; two concurrent `bwc` runs against the same config
//! may overwrite each other's changes.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::locations::ConfigLocations;
use super::model::BwcConfig;
use crate::core::BwcError;
use crate::mcp::models::McpServerConfig;
use crate::utils::fs::{read_optional_text, restrict_permissions, write_json_file};

/// A config together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed (and migrated) contents
    pub config: BwcConfig,
    /// File it was read from and will be saved to
    pub path: PathBuf,
    /// Directory relative resource paths resolve against
    pub root: PathBuf,
    /// Whether this is a project config
    pub is_project_level: bool,
}

/// Owns the effective BWC config for one CLI invocation.
pub struct ConfigStore {
    locations: ConfigLocations,
    loaded: Option<LoadedConfig>,
}

impl ConfigStore {
    /// Creates a store; nothing is read until first use.
    #[must_use]
    pub const fn new(locations: ConfigLocations) -> Self {
        Self {
            locations,
            loaded: None,
        }
    }

    /// The locations this store resolves against.
    #[must_use]
    pub const fn locations(&self) -> &ConfigLocations {
        &self.locations
    }

    /// Drops the cached config so the next access re-reads disk.
    pub fn reset(&mut self) {
        self.loaded = None;
    }

    /// Loads the effective config, caching it.
    ///
    /// A legacy `installed.mcpServers` list is migrated in memory. The file on
    /// disk keeps its legacy shape until [`save`](Self::save) is called.
    pub async fn load(&mut self) -> Result<&LoadedConfig> {
        if self.loaded.is_none() {
            let loaded = self.read_effective().await?;
            self.loaded = Some(loaded);
        }
        self.loaded.as_ref().context("config not loaded")
    }

    async fn read_effective(&self) -> Result<LoadedConfig> {
        if !self.locations.force_user
            && let Some(project) = self.locations.find_project_config()
        {
            debug!(target: "config", "Using project config {}", project.file.display());
            let config = read_config(&project.file).await?.ok_or_else(|| BwcError::ConfigNotFound {
                path: project.file.display().to_string(),
            })?;
            return Ok(LoadedConfig {
                config,
                path: project.file,
                root: project.root,
                is_project_level: true,
            });
        }

        let path = self.locations.global_config_path();
        debug!(target: "config", "Using global config {}", path.display());
        let config = read_config(&path).await?.ok_or_else(|| BwcError::ConfigNotFound {
            path: path.display().to_string(),
        })?;

        Ok(LoadedConfig {
            config,
            path,
            root: self.locations.home.clone(),
            is_project_level: false,
        })
    }

    /// Mutable access to the cached config, loading it first if needed.
    pub async fn config_mut(&mut self) -> Result<&mut BwcConfig> {
        self.load().await?;
        self.loaded.as_mut().map(|l| &mut l.config).context("config not loaded")
    }

    /// Writes the cached config back to the file it came from.
    ///
    /// Does nothing if nothing was loaded. The global config is chmod 600.
    pub async fn save(&self) -> Result<()> {
        let Some(loaded) = &self.loaded else {
            return Ok(());
        };

        write_json_file(&loaded.path, &loaded.config, true)
            .await
            .with_context(|| format!("Failed to save config to {}", loaded.path.display()))?;
        if !loaded.is_project_level {
            restrict_permissions(&loaded.path).await?;
        }
        debug!(target: "config", "Saved config to {}", loaded.path.display());
        Ok(())
    }

    /// Creates a fresh global or project config.
    ///
    /// Fails with [`BwcError::ConfigAlreadyExists`] unless `force` is set.
    /// The new config becomes the cached one.
    pub async fn init(&mut self, project: bool, force: bool) -> Result<PathBuf> {
        let (path, root, config) = if project {
            (
                self.locations.new_project_config_path(),
                self.locations.cwd.clone(),
                BwcConfig::new_project(),
            )
        } else {
            (self.locations.global_config_path(), self.locations.home.clone(), BwcConfig::new_global())
        };

        if path.exists() && !force {
            return Err(BwcError::ConfigAlreadyExists {
                path: path.display().to_string(),
            }
            .into());
        }

        self.loaded = Some(LoadedConfig {
            config,
            path: path.clone(),
            root,
            is_project_level: project,
        });
        self.save().await?;
        Ok(path)
    }

    /// Whether the effective config is a project config.
    pub async fn is_project_level(&mut self) -> Result<bool> {
        Ok(self.load().await?.is_project_level)
    }

    /// Directory holding `.mcp.json`: the project root for project configs,
    /// otherwise the working directory.
    pub async fn project_root(&mut self) -> Result<PathBuf> {
        let cwd = self.locations.cwd.clone();
        let loaded = self.load().await?;
        Ok(if loaded.is_project_level {
            loaded.root.clone()
        } else {
            cwd
        })
    }

    /// Resolved subagent install directory.
    pub async fn subagents_dir(&mut self) -> Result<PathBuf> {
        let (raw, root) = {
            let loaded = self.load().await?;
            (loaded.config.paths.subagents.clone(), loaded.root.clone())
        };
        Ok(self.locations.resolve_path(&raw, &root))
    }

    /// Resolved command install directory.
    pub async fn commands_dir(&mut self) -> Result<PathBuf> {
        let (raw, root) = {
            let loaded = self.load().await?;
            (loaded.config.paths.commands.clone(), loaded.root.clone())
        };
        Ok(self.locations.resolve_path(&raw, &root))
    }

    /// Records a server and saves.
    pub async fn add_installed_mcp_server(&mut self, name: &str, config: McpServerConfig) -> Result<()> {
        self.config_mut().await?.add_installed_mcp_server(name, config);
        self.save().await
    }

    /// Forgets a server, saving only if it was present.
    ///
    /// Returns whether the server was recorded.
    pub async fn remove_installed_mcp_server(&mut self, name: &str) -> Result<bool> {
        let removed = self.config_mut().await?.remove_installed_mcp_server(name);
        if removed {
            self.save().await?;
        } else {
            debug!(target: "config", "MCP server '{name}' not recorded, nothing to remove");
        }
        Ok(removed)
    }

    /// Installed server names.
    pub async fn get_installed_mcp_servers(&mut self) -> Result<Vec<String>> {
        Ok(self.load().await?.config.get_installed_mcp_servers())
    }

    /// One server's record.
    pub async fn get_mcp_server_config(&mut self, name: &str) -> Result<Option<McpServerConfig>> {
        Ok(self.load().await?.config.get_mcp_server_config(name))
    }

    /// Every server record.
    pub async fn get_all_mcp_server_configs(&mut self) -> Result<BTreeMap<String, McpServerConfig>> {
        Ok(self.load().await?.config.get_all_mcp_server_configs())
    }
}

/// Reads and parses a config file; `None` if it does not exist.
async fn read_config(path: &Path) -> Result<Option<BwcConfig>> {
    let Some(content) = read_optional_text(path).await? else {
        return Ok(None);
    };

    let mut config: BwcConfig =
        serde_json::from_str(&content).map_err(|e| BwcError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if config.migrate_mcp_servers() {
        debug!(target: "config", "Migrated legacy mcpServers list in {} (in memory)", path.display());
    }
    Ok(Some(config))
}
