//! Remove subagents, slash commands or MCP servers.
//!
//! ```bash
//! bwc remove --agent code-reviewer
//! bwc remove --mcp postgres --scope project --yes
//! bwc remove --mcp fetch brave-search
//! ```
//!
//! MCP removal reports one outcome per store. A store that fails does not stop
//! the others from being cleaned up.

use anyhow::Result;
use clap::{ArgGroup, Args};
use colored::Colorize;

use super::add::MarkdownKind;
use super::common::{CommandContext, confirm, parse_scope, record_failure};
use crate::core::BwcError;
use crate::mcp::{ProviderReconciler, RemovalOutcome, Scope, StoreOutcome};
use crate::utils::fs::remove_file_if_exists;

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["agent", "command", "mcp"])))]
pub struct RemoveCommand {
    /// Subagent to remove
    #[arg(long, value_name = "NAME")]
    agent: Option<String>,

    /// Slash command to remove
    #[arg(long, value_name = "NAME")]
    command: Option<String>,

    /// MCP server(s) to remove
    #[arg(long, value_name = "NAME", num_args = 1..)]
    mcp: Vec<String>,

    /// Scope to remove from, overriding the recorded one
    #[arg(long)]
    scope: Option<String>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Use the global config even inside a project
    #[arg(long)]
    user: bool,
}

impl RemoveCommand {
    /// Whether the global config must be used.
    pub const fn force_user(&self) -> bool {
        self.user
    }

    /// Runs the command.
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let scope = parse_scope(self.scope.as_deref())?;

        let (what, kind) = if let Some(name) = &self.agent {
            (format!("subagent '{name}'"), Some(MarkdownKind::Subagent))
        } else if let Some(name) = &self.command {
            (format!("command '{name}'"), Some(MarkdownKind::Command))
        } else {
            (format!("MCP server(s) {}", self.mcp.join(", ")), None)
        };

        if !self.yes && !confirm(&format!("Remove {what}?")).await? {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }

        match (kind, self.agent.as_deref().or(self.command.as_deref())) {
            (Some(kind), Some(name)) => remove_markdown(ctx, kind, name).await,
            _ => remove_mcp_servers(ctx, &self.mcp, scope).await,
        }
    }
}

async fn remove_markdown(ctx: &mut CommandContext, kind: MarkdownKind, name: &str) -> Result<()> {
    let dir = match kind {
        MarkdownKind::Subagent => ctx.store.subagents_dir().await?,
        MarkdownKind::Command => ctx.store.commands_dir().await?,
    };
    let path = dir.join(format!("{name}.md"));
    let file_removed = remove_file_if_exists(&path).await?;

    let config = ctx.store.config_mut().await?;
    let recorded = match kind {
        MarkdownKind::Subagent => config.remove_installed_subagent(name),
        MarkdownKind::Command => config.remove_installed_command(name),
    };

    if !file_removed && !recorded {
        return Err(BwcError::ResourceNotFound {
            resource_type: kind.label().to_string(),
            name: name.to_string(),
        }
        .into());
    }
    ctx.store.save().await?;

    println!("{} Removed {} '{}'", "✓".green(), kind.label(), name.bold());
    Ok(())
}

/// Removes each server in order. The first failure is returned after all ran.
pub(crate) async fn remove_mcp_servers(ctx: &mut CommandContext, names: &[String], scope: Option<Scope>) -> Result<()> {
    let mut first_error = None;
    for name in names {
        let result = ProviderReconciler::new(&ctx.gateway).remove(&mut ctx.store, name, scope).await;
        match result {
            Ok(outcome) => {
                print_removal_outcome(name, &outcome);
                if let StoreOutcome::Failed(reason) = &outcome.config_removed {
                    record_failure(&mut first_error, name, anyhow::anyhow!("Failed to update BWC config: {reason}"));
                }
            }
            Err(e) => record_failure(&mut first_error, name, e),
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn print_removal_outcome(name: &str, outcome: &RemovalOutcome) {
    let all_clear = [&outcome.config_removed, &outcome.mcp_json_removed, &outcome.live_deregistered]
        .iter()
        .all(|o| o.is_clear() || **o == StoreOutcome::Skipped);
    let mark = if all_clear { "✓".green() } else { "⚠".yellow() };
    println!("{mark} Removed MCP server '{}'", name.bold());

    for (label, store) in [
        ("BWC config", &outcome.config_removed),
        (".mcp.json", &outcome.mcp_json_removed),
        ("Claude/Docker", &outcome.live_deregistered),
    ] {
        let text = store.to_string();
        let text = match store {
            StoreOutcome::Removed => text.green(),
            StoreOutcome::Failed(_) => text.red(),
            _ => text.dimmed(),
        };
        println!("  {label:<14} {text}");
    }
}
