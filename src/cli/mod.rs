//! Command-line interface for BWC.
//!
//! # Commands
//!
//! - `init` - create the global config or a project config
//! - `add` - install a subagent, a slash command or MCP servers
//! - `remove` - uninstall them again
//! - `list` - show what is installed, optionally verified against Claude Code
//!
//! ```bash
//! bwc init --project
//! bwc add --mcp postgres --scope project
//! bwc list --mcps --verify
//! bwc remove --mcp postgres --yes
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - debug logging on stderr
//! - `--quiet` - no logging at all
//! - `--no-progress` - no spinners (also `BWC_NO_PROGRESS`)
//!
//! Every command gets a [`CommandContext`] built from the environment, so tests
//! can run the same code against a temporary home and a scripted process
//! runner through [`Cli::execute_with`].

mod add;
pub mod common;
mod init;
mod list;
mod remove;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use common::CommandContext;
pub use list::OutputFormat;

/// Root command.
#[derive(Parser)]
#[command(
    name = "bwc",
    about = "Build With Claude - manage Claude Code subagents, commands and MCP servers",
    version,
    long_about = "BWC installs subagents, slash commands and MCP servers from the Build With Claude registry \
                  and keeps its own records in sync with Claude Code and Docker MCP Toolkit."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a BWC configuration
    Init(init::InitCommand),

    /// Install a subagent, command or MCP servers
    Add(add::AddCommand),

    /// Uninstall a subagent, command or MCP servers
    Remove(remove::RemoveCommand),

    /// List installed resources
    List(list::ListCommand),
}

impl Cli {
    /// Log filter implied by the global flags, or `None` when logging is off.
    ///
    /// `RUST_LOG` is only consulted when neither flag is given.
    #[must_use]
    pub fn log_filter(&self) -> Option<String> {
        if self.quiet {
            None
        } else if self.verbose {
            Some("debug".to_string())
        } else {
            Some(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        }
    }

    fn force_user(&self) -> bool {
        match &self.command {
            Commands::Init(_) => false,
            Commands::Add(cmd) => cmd.force_user(),
            Commands::Remove(cmd) => cmd.force_user(),
            Commands::List(cmd) => cmd.force_user(),
        }
    }

    /// Runs the parsed command against the real environment.
    pub async fn execute(self) -> Result<()> {
        let mut ctx = CommandContext::from_env(self.force_user(), self.no_progress)?;
        self.execute_with(&mut ctx).await
    }

    /// Runs the parsed command with an explicit context.
    pub async fn execute_with(self, ctx: &mut CommandContext) -> Result<()> {
        match self.command {
            Commands::Init(cmd) => cmd.execute(ctx).await,
            Commands::Add(cmd) => cmd.execute(ctx).await,
            Commands::Remove(cmd) => cmd.execute(ctx).await,
            Commands::List(cmd) => cmd.execute(ctx).await,
        }
    }
}
