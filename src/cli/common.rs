//! Common utilities for CLI commands

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::config::{ConfigLocations, ConfigStore};
use crate::mcp::{ConnectionStatus, Scope, VerificationResult};
use crate::process::ExternalProcessGateway;
use crate::registry::{Registry, RegistryClient};
use crate::utils::progress::{ProgressBar, spinner_with_message};

/// Everything a command needs besides its own arguments.
pub struct CommandContext {
    /// The effective BWC config
    pub store: ConfigStore,
    /// External tools
    pub gateway: ExternalProcessGateway,
    /// Hide spinners
    pub no_progress: bool,
}

impl CommandContext {
    /// Context for a real invocation, reading the environment.
    pub fn from_env(force_user: bool, no_progress: bool) -> Result<Self> {
        let locations = ConfigLocations::from_env(force_user)?;
        let gateway = ExternalProcessGateway::system(&locations.home);
        Ok(Self::new(ConfigStore::new(locations), gateway, no_progress))
    }

    /// Context from explicit parts.
    #[must_use]
    pub const fn new(store: ConfigStore, gateway: ExternalProcessGateway, no_progress: bool) -> Self {
        Self {
            store,
            gateway,
            no_progress,
        }
    }

    /// A spinner honouring `--no-progress`.
    #[must_use]
    pub fn spinner(&self, msg: impl Into<String>) -> ProgressBar {
        spinner_with_message(msg, self.no_progress)
    }

    /// Client for the configured registry.
    pub async fn registry_client(&mut self) -> Result<RegistryClient> {
        let url = self.store.load().await?.config.registry.clone();
        RegistryClient::new(&url)
    }

    /// Fetches the configured registry behind a spinner.
    pub async fn fetch_registry(&mut self) -> Result<(RegistryClient, Registry)> {
        let client = self.registry_client().await?;
        let spinner = self.spinner(format!("Fetching registry from {}", client.url()));
        let result = client.fetch().await;
        spinner.finish_and_clear();
        Ok((client, result?))
    }
}

/// Parses `--scope`; done before anything touches disk, network or processes.
pub fn parse_scope(raw: Option<&str>) -> Result<Option<Scope>> {
    Ok(raw.map(str::parse::<Scope>).transpose()?)
}

/// Asks a y/N question on stdin. Anything but `y`/`yes` is no.
pub async fn confirm(prompt: &str) -> Result<bool> {
    print!("{} ", format!("{prompt} [y/N]:").yellow());
    io::stdout().flush()?;

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut response = String::new();
    reader.read_line(&mut response).await?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Prints one line per batch item failure and keeps the first error.
pub fn record_failure(first: &mut Option<anyhow::Error>, name: &str, error: anyhow::Error) {
    eprintln!("{} {name}: {error:#}", "✗".red());
    warn!("'{name}' failed: {error:#}");
    if first.is_none() {
        *first = Some(error);
    }
}

/// Prints verification results with their fix commands.
pub fn print_verification_results(results: &[VerificationResult]) {
    if results.is_empty() {
        println!("No MCP servers to verify.");
        return;
    }

    for result in results {
        let status = match (result.actually_installed, result.connection_status) {
            (true, ConnectionStatus::Connected) => "✓".green(),
            (true, _) => "⚠".yellow(),
            (false, _) => "✗".red(),
        };
        println!(
            "{status} {} ({}, {}, {}) - {}",
            result.name.bold(),
            result.provider,
            result.transport,
            result.scope,
            result.connection_status
        );
        if let Some(error) = &result.verification_error {
            println!("    {}", error.dimmed());
        }
        if !result.fix_commands.is_empty() {
            println!("    {}", "To fix:".cyan());
            for command in &result.fix_commands {
                println!("      {command}");
            }
        }
    }
}
