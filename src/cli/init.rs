//! Create a BWC configuration.
//!
//! `bwc init` writes the global config (`~/.bwc/config.json`, or the path in
//! `BWC_CONFIG_PATH`). `bwc init --project` writes `./bwc.config.json`, which
//! then takes precedence for every command run inside the project.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::CommandContext;

#[derive(Args)]
pub struct InitCommand {
    /// Create a project config in the current directory
    #[arg(short, long)]
    project: bool,

    /// Overwrite an existing config
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    /// Runs the command.
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let path = ctx.store.init(self.project, self.force).await?;
        let level = if self.project { "project" } else { "global" };
        println!("{} Created {level} configuration at {}", "✓".green(), path.display());

        if self.project {
            println!("  {} Subagents and commands will install under .claude/", "→".cyan());
        }
        Ok(())
    }
}
