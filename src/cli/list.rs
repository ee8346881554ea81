//! List installed resources.
//!
//! ```bash
//! bwc list
//! bwc list --mcps --verify
//! bwc list --format json
//! ```
//!
//! Listing only reads. A legacy config is shown in its migrated form but the
//! file itself is left untouched.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

use super::common::{CommandContext, print_verification_results};
use crate::mcp::{McpServerConfig, VerificationEngine, VerificationResult};

/// Output format for `bwc list`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sections
    #[default]
    Table,
    /// One JSON document on stdout
    Json,
}

#[derive(Args)]
pub struct ListCommand {
    /// Show subagents
    #[arg(long)]
    agents: bool,

    /// Show slash commands
    #[arg(long)]
    commands: bool,

    /// Show MCP servers
    #[arg(long)]
    mcps: bool,

    /// Check MCP servers against Claude Code and Docker
    #[arg(long)]
    verify: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Use the global config even inside a project
    #[arg(long)]
    user: bool,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Listing {
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subagents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mcp_servers: Option<BTreeMap<String, McpServerConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<Vec<VerificationResult>>,
}

impl ListCommand {
    /// Whether the global config must be used.
    pub const fn force_user(&self) -> bool {
        self.user
    }

    const fn show_all(&self) -> bool {
        !(self.agents || self.commands || self.mcps)
    }

    /// Runs the command.
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let listing = self.collect(ctx).await?;
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
            OutputFormat::Table => print_table(&listing),
        }
        Ok(())
    }

    async fn collect(&self, ctx: &mut CommandContext) -> Result<Listing> {
        let all = self.show_all();
        let loaded = ctx.store.load().await?;
        let mut listing = Listing {
            config_path: loaded.path.display().to_string(),
            ..Listing::default()
        };

        if all || self.agents {
            listing.subagents = Some(loaded.config.installed.subagents.clone());
        }
        if all || self.commands {
            listing.commands = Some(loaded.config.installed.commands.clone());
        }
        if all || self.mcps || self.verify {
            let servers = loaded.config.get_all_mcp_server_configs();
            if self.verify {
                let spinner = ctx.spinner("Verifying MCP servers");
                let results = VerificationEngine::new(&ctx.gateway).verify_all(&servers).await;
                spinner.finish_and_clear();
                listing.verification = Some(results?);
            }
            listing.mcp_servers = Some(servers);
        }
        Ok(listing)
    }
}

fn print_table(listing: &Listing) {
    println!("{} {}", "Config:".bold(), listing.config_path.dimmed());

    if let Some(subagents) = &listing.subagents {
        print_names("Subagents", subagents);
    }
    if let Some(commands) = &listing.commands {
        print_names("Commands", commands);
    }

    if let Some(verification) = &listing.verification {
        println!("\n{}", "MCP servers:".bold());
        print_verification_results(verification);
    } else if let Some(servers) = &listing.mcp_servers {
        println!("\n{}", "MCP servers:".bold());
        if servers.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for (name, config) in servers {
            let endpoint = config.url.as_deref().map(|u| format!(" {u}")).unwrap_or_default();
            println!(
                "  {} ({}, {}, {}){}",
                name.cyan(),
                config.provider,
                config.transport,
                config.scope,
                endpoint.dimmed()
            );
        }
    }
}

fn print_names(title: &str, names: &[String]) {
    println!("\n{}", format!("{title}:").bold());
    if names.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for name in names {
        println!("  {}", name.cyan());
    }
}
