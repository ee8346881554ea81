//! The process boundary: every external command BWC runs goes through here.
//!
//! BWC integrates with the Claude CLI and Docker MCP Toolkit only by shelling
//! out. [`ProcessRunner`] is the narrow contract for that, `run(program, args)`
//! returning captured stdout/stderr and the exit code, so reconciliation and
//! verification can run entirely against an in-memory runner in tests.
//!
//! A non-zero exit is *not* an error at this layer; only failing to spawn the
//! program is. Callers decide whether a failure is fatal. No timeouts and no
//! retries are applied: a hung external binary hangs the command.

pub mod claude;
pub mod docker;

use anyhow::{Context, Result};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

use crate::core::BwcError;

pub use claude::ClaudeCli;
pub use docker::DockerCli;

/// Boxed future returned by [`ProcessRunner::run`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
    /// Exit code; `None` if killed by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// A successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// A failed output with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(code),
        }
    }

    /// Whether the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout and stderr joined, for "not found" style matching.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Runs external programs.
///
/// Implementations must be usable behind `Arc<dyn ProcessRunner>`.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args` to completion, capturing output.
    ///
    /// Errors only when the program cannot be started.
    fn run<'a>(&'a self, program: &'a str, args: &'a [String]) -> BoxFuture<'a, Result<ProcessOutput>>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run<'a>(&'a self, program: &'a str, args: &'a [String]) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            tracing::debug!(target: "process", "Executing command: {} {}", program, args.join(" "));

            let output = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await
                .with_context(|| format!("Failed to execute {program}"))?;

            let result = ProcessOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
            };

            if result.success() {
                tracing::trace!(target: "process", "{program} completed successfully");
            } else {
                tracing::debug!(
                    target: "process",
                    "{} exited with {:?}: {}",
                    program,
                    result.exit_code,
                    result.stderr.trim()
                );
            }
            Ok(result)
        })
    }
}

/// The external tools BWC drives, sharing one runner.
pub struct ExternalProcessGateway {
    runner: Arc<dyn ProcessRunner>,
    claude: ClaudeCli,
    docker: DockerCli,
}

impl ExternalProcessGateway {
    /// Real processes with standard Claude CLI discovery under `home`.
    pub fn system(home: &Path) -> Self {
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner);
        Self {
            claude: ClaudeCli::new(Arc::clone(&runner), home),
            docker: DockerCli::new(Arc::clone(&runner)),
            runner,
        }
    }

    /// Assembles a gateway from parts.
    pub fn new(runner: Arc<dyn ProcessRunner>, claude: ClaudeCli, docker: DockerCli) -> Self {
        Self {
            runner,
            claude,
            docker,
        }
    }

    /// The underlying runner.
    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    /// The Claude CLI.
    pub const fn claude(&self) -> &ClaudeCli {
        &self.claude
    }

    /// The Docker CLI.
    pub const fn docker(&self) -> &DockerCli {
        &self.docker
    }

    /// `npm --version`; fails with [`BwcError::PrerequisiteMissing`].
    pub async fn probe_npm(&self) -> Result<()> {
        match self.runner.run("npm", &["--version".to_string()]).await {
            Ok(out) if out.success() => {
                tracing::debug!(target: "process", "npm available: {}", out.stdout.trim());
                Ok(())
            }
            _ => Err(BwcError::PrerequisiteMissing {
                tool: "npm".to_string(),
            }
            .into()),
        }
    }

    /// Runs a full shell-style command line (program first), failing on non-zero exit.
    pub async fn run_command_line(&self, argv: &[String]) -> Result<ProcessOutput> {
        let Some((program, args)) = argv.split_first() else {
            return Err(BwcError::Other {
                message: "empty command".to_string(),
            }
            .into());
        };
        let output = self.runner.run(program, args).await?;
        if !output.success() {
            return Err(BwcError::ProcessFailed {
                command: command_line(program, args),
                stderr: output.stderr,
            }
            .into());
        }
        Ok(output)
    }
}

/// Renders a command line for messages and fix suggestions.
#[must_use]
pub fn command_line(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| {
        if a.is_empty() || a.contains(char::is_whitespace) {
            format!("\"{a}\"")
        } else {
            a.clone()
        }
    }));
    parts.join(" ")
}
