//! Add subagents, slash commands or MCP servers.
//!
//! ```bash
//! bwc add --agent code-reviewer
//! bwc add --command commit
//! bwc add --mcp postgres --source docker --scope project
//! bwc add --mcp linear --transport sse --url https://mcp.linear.app/sse
//! bwc add --mcp brave-search --env BRAVE_API_KEY=$BRAVE_API_KEY
//! bwc add --setup
//! ```
//!
//! Several `--mcp` names form a batch installed in order. A failure is reported
//! and the next name is still attempted; the first failure becomes the exit
//! status. Freshly installed servers are verified at the end.

use anyhow::Result;
use clap::{ArgGroup, Args};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use super::common::{CommandContext, confirm, parse_scope, print_verification_results, record_failure};
use crate::mcp::models::Transport;
use crate::mcp::{InstallOptions, InstallOutcome, Integration, ProviderReconciler, VerificationEngine};
use crate::registry::{McpServerDescriptor, MethodType, Registry, ResourceEntry};
use crate::utils::fs::{atomic_write, ensure_dir};

/// Resource kinds installed as markdown files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkdownKind {
    Subagent,
    Command,
}

impl MarkdownKind {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Subagent => "subagent",
            Self::Command => "command",
        }
    }
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["agent", "command", "mcp", "setup"])))]
pub struct AddCommand {
    /// Subagent to install
    #[arg(long, value_name = "NAME")]
    agent: Option<String>,

    /// Slash command to install
    #[arg(long, value_name = "NAME")]
    command: Option<String>,

    /// MCP server(s) to install, in order
    #[arg(long, value_name = "NAME", num_args = 1..)]
    mcp: Vec<String>,

    /// Register the Docker MCP gateway with the Claude CLI
    #[arg(long)]
    setup: bool,

    /// Installation method: docker, npm, manual or bwc
    #[arg(long, value_name = "SOURCE")]
    source: Option<String>,

    /// Scope: local, user or project
    #[arg(long)]
    scope: Option<String>,

    /// Transport: stdio, sse or http
    #[arg(long)]
    transport: Option<String>,

    /// Endpoint for sse/http servers
    #[arg(long)]
    url: Option<String>,

    /// Environment variable for the server (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    yes: bool,

    /// Use the global config even inside a project
    #[arg(long)]
    user: bool,
}

impl AddCommand {
    /// Whether the global config must be used.
    pub const fn force_user(&self) -> bool {
        self.user
    }

    /// Runs the command.
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let scope = parse_scope(self.scope.as_deref())?;
        let transport = self.transport.as_deref().map(str::parse::<Transport>).transpose()?;
        let method = self.source.as_deref().map(str::parse::<MethodType>).transpose()?;

        if self.setup {
            return setup_gateway(ctx).await;
        }
        if let Some(name) = &self.agent {
            return add_markdown(ctx, MarkdownKind::Subagent, name, self.yes).await;
        }
        if let Some(name) = &self.command {
            return add_markdown(ctx, MarkdownKind::Command, name, self.yes).await;
        }

        let options = InstallOptions {
            method,
            scope: scope.unwrap_or_default(),
            transport,
            url: self.url.clone(),
            env_vars: self.env.clone(),
        };
        add_mcp_servers(ctx, &self.mcp, &options).await
    }
}

async fn setup_gateway(ctx: &mut CommandContext) -> Result<()> {
    let newly = ProviderReconciler::new(&ctx.gateway).setup_docker_gateway().await?;
    if newly {
        println!("{} Docker MCP gateway registered with Claude Code", "✓".green());
    } else {
        println!("{} Docker MCP gateway is already registered", "✓".green());
    }
    println!("  {} Restart Claude Code to load the gateway", "→".cyan());
    Ok(())
}

async fn add_markdown(ctx: &mut CommandContext, kind: MarkdownKind, name: &str, yes: bool) -> Result<()> {
    let (client, registry) = ctx.fetch_registry().await?;
    let entry = find_markdown(&registry, kind, name)?;
    let content = client.resource_content(entry).await?;

    let dir = match kind {
        MarkdownKind::Subagent => ctx.store.subagents_dir().await?,
        MarkdownKind::Command => ctx.store.commands_dir().await?,
    };
    let path = dir.join(format!("{name}.md"));
    if path.exists() && !yes && !confirm(&format!("{} already exists. Overwrite?", path.display())).await? {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    write_markdown(&dir, &path, &content).await?;

    let config = ctx.store.config_mut().await?;
    match kind {
        MarkdownKind::Subagent => config.add_installed_subagent(name),
        MarkdownKind::Command => config.add_installed_command(name),
    }
    ctx.store.save().await?;

    println!("{} Installed {} '{}' to {}", "✓".green(), kind.label(), name.bold(), path.display());
    Ok(())
}

fn find_markdown<'r>(registry: &'r Registry, kind: MarkdownKind, name: &str) -> Result<&'r ResourceEntry> {
    Ok(match kind {
        MarkdownKind::Subagent => registry.find_subagent(name)?,
        MarkdownKind::Command => registry.find_command(name)?,
    })
}

async fn write_markdown(dir: &Path, path: &Path, content: &str) -> Result<()> {
    ensure_dir(dir).await?;
    atomic_write(path, content.as_bytes()).await
}

/// Installs each server in order, then verifies the ones that succeeded.
pub(crate) async fn add_mcp_servers(ctx: &mut CommandContext, names: &[String], options: &InstallOptions) -> Result<()> {
    let registry = match ctx.fetch_registry().await {
        Ok((_, registry)) => Some(registry),
        Err(e) if options.url.is_some() => {
            warn!("Registry unavailable, installing from flags only: {e:#}");
            None
        }
        Err(e) => return Err(e),
    };

    let mut first_error = None;
    let mut installed = Vec::new();
    for name in names {
        let descriptor = match registry.as_ref().map(|r| r.find_mcp_server(name)) {
            Some(Ok(d)) => d.clone(),
            Some(Err(_)) | None if options.url.is_some() => McpServerDescriptor::named(name),
            Some(Err(e)) => {
                record_failure(&mut first_error, name, e.into());
                continue;
            }
            None => McpServerDescriptor::named(name),
        };

        match ProviderReconciler::new(&ctx.gateway).install(&mut ctx.store, &descriptor, options).await {
            Ok(outcome) => {
                print_install_outcome(&outcome);
                installed.push(outcome.name);
            }
            Err(e) => record_failure(&mut first_error, name, e),
        }
    }

    if !installed.is_empty() {
        let all = ctx.store.get_all_mcp_server_configs().await?;
        let fresh: BTreeMap<_, _> = all.into_iter().filter(|(name, _)| installed.contains(name)).collect();
        let spinner = ctx.spinner("Verifying installation");
        let results = VerificationEngine::new(&ctx.gateway).verify_all(&fresh).await;
        spinner.finish_and_clear();
        println!();
        print_verification_results(&results?);
    }

    first_error.map_or(Ok(()), Err)
}

fn print_install_outcome(outcome: &InstallOutcome) {
    println!(
        "{} Installed MCP server '{}' via {} ({} scope)",
        "✓".green(),
        outcome.name.bold(),
        outcome.method,
        outcome.config.scope
    );
    match &outcome.integration {
        Integration::Registered => println!("  {} Registered with the Claude CLI", "→".cyan()),
        Integration::ViaGateway => println!("  {} Available through the Docker MCP gateway", "→".cyan()),
        Integration::ManualFallback { reason } => {
            println!("  {} Manual configuration needed: {reason}", "⚠".yellow());
        }
    }
    if outcome.added_to_mcp_json {
        println!("  {} Added to .mcp.json", "→".cyan());
    }
    for line in &outcome.instructions {
        for part in line.lines() {
            println!("    {part}");
        }
    }
}
