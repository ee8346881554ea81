//! Resolution of config file locations.
//!
//! Every environment input BWC consults lives in [`ConfigLocations`]. Only the
//! CLI calls [`ConfigLocations::from_env`]; library code and tests build the
//! value explicitly so they never race on process-global environment state.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, GLOBAL_CONFIG_DIR, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
    TEST_HOME_ENV,
};
use crate::utils::platform::{expand_tilde, get_home_dir};

/// Inputs for finding config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    /// Home directory (`BWC_TEST_HOME` or the platform home)
    pub home: PathBuf,
    /// Global config override (`BWC_CONFIG_PATH`)
    pub global_config_override: Option<PathBuf>,
    /// Directory the upward project search starts from
    pub cwd: PathBuf,
    /// Skip project configs and use the global config
    pub force_user: bool,
}

/// A project config found by upward search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfigPath {
    /// The config file
    pub file: PathBuf,
    /// Project root that relative paths resolve against; for
    /// `.bwc/config.json` this is the directory containing `.bwc`
    pub root: PathBuf,
}

impl ConfigLocations {
    /// Locations with no global override and project search enabled.
    #[must_use]
    pub fn new(home: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            global_config_override: None,
            cwd: cwd.into(),
            force_user: false,
        }
    }

    /// Overrides the global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_override = Some(path.into());
        self
    }

    /// Sets the "force user level" flag.
    #[must_use]
    pub const fn with_force_user(mut self, force_user: bool) -> Self {
        self.force_user = force_user;
        self
    }

    /// Reads `BWC_TEST_HOME`, `BWC_CONFIG_PATH` and the working directory.
    pub fn from_env(force_user: bool) -> Result<Self> {
        let home = match std::env::var_os(TEST_HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => get_home_dir()?,
        };
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;

        let mut locations = Self::new(&home, cwd).with_force_user(force_user);
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.trim().is_empty()
        {
            locations = locations.with_global_config(expand_tilde(&path, &home));
        }
        Ok(locations)
    }

    /// `BWC_CONFIG_PATH` if set, else `~/.bwc/config.json`.
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.global_config_override
            .clone()
            .unwrap_or_else(|| self.home.join(GLOBAL_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Where `bwc init --project` writes.
    #[must_use]
    pub fn new_project_config_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_CONFIG_FILE)
    }

    /// Searches from `cwd` upward for `bwc.config.json`, then `.bwc/config.json`.
    ///
    /// The global config is never mistaken for a project config, even when the
    /// search passes through the home directory.
    #[must_use]
    pub fn find_project_config(&self) -> Option<ProjectConfigPath> {
        let global = self.global_config_path();
        let mut dir: Option<&Path> = Some(self.cwd.as_path());

        while let Some(current) = dir {
            let file = current.join(PROJECT_CONFIG_FILE);
            if file.is_file() && file != global {
                return Some(ProjectConfigPath {
                    file,
                    root: current.to_path_buf(),
                });
            }

            let nested = current.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME);
            if nested.is_file() && nested != global {
                return Some(ProjectConfigPath {
                    file: nested,
                    root: current.to_path_buf(),
                });
            }

            dir = current.parent();
        }

        None
    }

    /// Expands `~` and anchors relative paths at `base`.
    #[must_use]
    pub fn resolve_path(&self, raw: &str, base: &Path) -> PathBuf {
        let expanded = expand_tilde(raw, &self.home);
        if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_global_config_path_default_and_override() {
        let loc = ConfigLocations::new("/home/u", "/work");
        assert_eq!(loc.global_config_path(), PathBuf::from("/home/u/.bwc/config.json"));

        let loc = loc.with_global_config("/tmp/custom.json");
        assert_eq!(loc.global_config_path(), PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn test_find_project_config_walks_upward() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        let nested = root.join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("bwc.config.json"), "{}").unwrap();

        let loc = ConfigLocations::new(temp.path().join("home"), &nested);
        let found = loc.find_project_config().unwrap();
        assert_eq!(found.file, root.join("bwc.config.json"));
        assert_eq!(found.root, root);
    }

    #[test]
    fn test_find_project_config_prefers_file_over_dir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        std::fs::create_dir_all(root.join(".bwc")).unwrap();
        std::fs::write(root.join(".bwc").join("config.json"), "{}").unwrap();

        let loc = ConfigLocations::new(temp.path().join("home"), &root);
        let found = loc.find_project_config().unwrap();
        assert_eq!(found.file, root.join(".bwc").join("config.json"));
        assert_eq!(found.root, root);

        std::fs::write(root.join("bwc.config.json"), "{}").unwrap();
        let found = loc.find_project_config().unwrap();
        assert_eq!(found.file, root.join("bwc.config.json"));
    }

    #[test]
    fn test_find_project_config_skips_global_config() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        std::fs::create_dir_all(home.join(".bwc")).unwrap();
        std::fs::write(home.join(".bwc").join("config.json"), "{}").unwrap();
        let work = home.join("work");
        std::fs::create_dir_all(&work).unwrap();

        let loc = ConfigLocations::new(&home, &work);
        assert!(loc.find_project_config().is_none());
    }

    #[test]
    fn test_resolve_path() {
        let loc = ConfigLocations::new("/home/u", "/work");
        let base = Path::new("/repo");
        assert_eq!(loc.resolve_path("~/.claude/agents", base), PathBuf::from("/home/u/.claude/agents"));
        assert_eq!(loc.resolve_path(".claude/agents", base), PathBuf::from("/repo/.claude/agents"));
        assert_eq!(loc.resolve_path("/abs/agents", base), PathBuf::from("/abs/agents"));
    }

    #[test]
    #[serial]
    fn test_from_env_honours_overrides() {
        let temp = TempDir::new().unwrap();
        // SAFETY: serialized with the other env-reading tests.
        unsafe {
            std::env::set_var(TEST_HOME_ENV, temp.path());
            std::env::set_var(CONFIG_PATH_ENV, "~/custom/bwc.json");
        }

        let loc = ConfigLocations::from_env(true).unwrap();

        unsafe {
            std::env::remove_var(TEST_HOME_ENV);
            std::env::remove_var(CONFIG_PATH_ENV);
        }

        assert_eq!(loc.home, temp.path());
        assert_eq!(loc.global_config_path(), temp.path().join("custom").join("bwc.json"));
        assert!(loc.force_user);
    }
}
