//! Common test utilities for BWC integration tests
//!
//! Every run gets its own home (`BWC_TEST_HOME`), global config path
//! (`BWC_CONFIG_PATH`) and project directory, so nothing touches the real
//! `~/.bwc` or `~/.claude`.

// Allow dead code because not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Registry URL nothing listens on.
pub const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:1/registry.json";

/// An isolated home plus project directory.
pub struct TestEnv {
    _temp: TempDir,
    pub home: PathBuf,
    pub project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let project = temp.path().join("project");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&project).unwrap();
        Self {
            _temp: temp,
            home,
            project,
        }
    }

    /// `bwc` running in the project directory with the isolated environment.
    pub fn bwc(&self) -> Command {
        let mut cmd = Command::cargo_bin("bwc").unwrap();
        cmd.current_dir(&self.project)
            .env("BWC_TEST_HOME", &self.home)
            .env("BWC_CONFIG_PATH", self.global_config())
            .env("BWC_NO_PROGRESS", "1")
            .env_remove("RUST_LOG");
        for var in ["HTTP_PROXY", "HTTPS_PROXY", "NO_PROXY", "http_proxy", "https_proxy", "no_proxy"] {
            cmd.env_remove(var);
        }
        cmd
    }

    pub fn global_config(&self) -> PathBuf {
        self.home.join(".bwc").join("config.json")
    }

    pub fn project_config(&self) -> PathBuf {
        self.project.join("bwc.config.json")
    }

    /// Writes `content` as the global config.
    pub fn write_global_config(&self, content: &str) {
        write(&self.global_config(), content);
    }

    /// Writes a project config pointing at an unreachable registry.
    pub fn write_offline_project_config(&self) {
        let config = serde_json::json!({
            "version": "1.0",
            "registry": UNREACHABLE_REGISTRY,
            "paths": {"subagents": ".claude/agents", "commands": ".claude/commands"},
            "installed": {"subagents": [], "commands": [], "mcpServers": {}}
        });
        write(&self.project_config(), &serde_json::to_string_pretty(&config).unwrap());
    }

    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Installs a fake `claude` at `~/.claude/local/claude` that logs its
    /// arguments and reports `listing` for `claude mcp list`.
    #[cfg(unix)]
    pub fn install_fake_claude(&self, listing: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.home.join(".claude").join("local").join("claude");
        let script = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> \"$BWC_TEST_HOME/claude-calls.log\"\n\
             if [ \"$1\" = \"mcp\" ] && [ \"$2\" = \"list\" ]; then\n\
             cat <<'EOF'\n{listing}\nEOF\n\
             fi\n\
             exit 0\n"
        );
        write(&path, &script);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Argument lines the fake `claude` was called with.
    pub fn claude_calls(&self) -> Vec<String> {
        fs::read_to_string(self.home.join("claude-calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
