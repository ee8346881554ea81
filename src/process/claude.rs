//! Discovery and invocation of the Claude CLI.
//!
//! The binary is looked for, in order, in:
//!
//! 1. `~/.claude/local/claude` (the per-user installer location)
//! 2. `/usr/local/bin`, `/opt/homebrew/bin`, `/usr/bin`
//! 3. `PATH`, via `which`
//! 4. `sh -c "command -v claude"`
//!
//! The first hit is cached for the lifetime of the [`ClaudeCli`] value.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ProcessOutput, ProcessRunner};
use crate::constants::CLAUDE_BINARY;
use crate::core::BwcError;
use crate::mcp::models::Scope;

const SYSTEM_DIRS: &[&str] = &["/usr/local/bin", "/opt/homebrew/bin", "/usr/bin"];

/// Handle to the Claude CLI.
pub struct ClaudeCli {
    runner: Arc<dyn ProcessRunner>,
    candidates: Vec<PathBuf>,
    path_lookup: bool,
    cached: Mutex<Option<PathBuf>>,
}

impl ClaudeCli {
    /// Standard discovery rooted at `home`.
    pub fn new(runner: Arc<dyn ProcessRunner>, home: &Path) -> Self {
        let mut candidates = vec![home.join(".claude").join("local").join(CLAUDE_BINARY)];
        candidates.extend(SYSTEM_DIRS.iter().map(|dir| Path::new(dir).join(CLAUDE_BINARY)));
        Self {
            runner,
            candidates,
            path_lookup: true,
            cached: Mutex::new(None),
        }
    }

    /// Discovery limited to `candidates` and the shell fallback; `PATH` is not searched.
    pub fn with_candidates(runner: Arc<dyn ProcessRunner>, candidates: Vec<PathBuf>) -> Self {
        Self {
            runner,
            candidates,
            path_lookup: false,
            cached: Mutex::new(None),
        }
    }

    /// Skips discovery and always uses `binary`.
    pub fn with_binary(runner: Arc<dyn ProcessRunner>, binary: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            candidates: Vec::new(),
            path_lookup: false,
            cached: Mutex::new(Some(binary.into())),
        }
    }

    /// Forgets the cached binary location.
    pub async fn reset_cache(&self) {
        *self.cached.lock().await = None;
    }

    /// Locates the binary, using the cache when possible.
    pub async fn find(&self) -> Result<PathBuf> {
        let mut cached = self.cached.lock().await;
        if let Some(path) = cached.as_ref() {
            return Ok(path.clone());
        }

        let found = self.discover().await.ok_or(BwcError::ClaudeCliNotFound)?;
        debug!(target: "process", "Found Claude CLI at {}", found.display());
        *cached = Some(found.clone());
        Ok(found)
    }

    async fn discover(&self) -> Option<PathBuf> {
        if let Some(path) = self.candidates.iter().find(|p| p.is_file()) {
            return Some(path.clone());
        }

        if self.path_lookup
            && let Ok(path) = which::which(CLAUDE_BINARY)
        {
            return Some(path);
        }

        let args = vec!["-c".to_string(), format!("command -v {CLAUDE_BINARY}")];
        match self.runner.run("sh", &args).await {
            Ok(out) if out.success() => {
                let line = out.stdout.lines().next().unwrap_or("").trim();
                (!line.is_empty()).then(|| PathBuf::from(line))
            }
            _ => None,
        }
    }

    /// Runs the CLI with `args`.
    ///
    /// A launch failure reports [`BwcError::ClaudeCliNotFound`] and clears the
    /// cache; a non-zero exit is returned as output.
    pub async fn exec(&self, args: &[String]) -> Result<ProcessOutput> {
        let binary = self.find().await?;
        let program = binary.to_string_lossy().into_owned();

        match self.runner.run(&program, args).await {
            Ok(output) => Ok(output),
            Err(e) => {
                debug!(target: "process", "Failed to launch {program}: {e:#}");
                self.reset_cache().await;
                Err(BwcError::ClaudeCliNotFound.into())
            }
        }
    }

    /// `claude mcp list`.
    pub async fn mcp_list(&self) -> Result<ProcessOutput> {
        self.exec(&["mcp".to_string(), "list".to_string()]).await
    }

    /// `claude mcp remove --scope <scope> <name>`.
    pub async fn mcp_remove(&self, name: &str, scope: Scope) -> Result<ProcessOutput> {
        let args = vec![
            "mcp".to_string(),
            "remove".to_string(),
            "--scope".to_string(),
            scope.to_string(),
            name.to_string(),
        ];
        self.exec(&args).await
    }
}
