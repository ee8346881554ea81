//! Install and removal of MCP servers across every store.
//!
//! A server touches up to four places that share no transaction: the BWC
//! config, the project `.mcp.json`, the Claude CLI's live registrations and
//! Docker MCP Toolkit. [`ProviderReconciler`] drives one server through all of
//! them and reports what happened to each.
//!
//! # Install
//!
//! 1. Resolve the installation method (`bwc` picks a concrete one).
//! 2. Run the concrete step: probe Docker and enable the server in the
//!    toolkit, probe npm and optionally install globally, or collect the
//!    manual steps.
//! 3. For Claude-managed servers, replay the registry's `claude mcp add`
//!    template with the caller's scope and env. Failure degrades to printed
//!    manual configuration.
//! 4. Record the server in the BWC config, and in `.mcp.json` when
//!    [`should_add_to_mcp_json`] allows.
//!
//! # Removal
//!
//! Docker-enabled servers are disabled in the toolkit and dropped from the
//! config. Everything else gets three independent attempts (config,
//! `.mcp.json`, `claude mcp remove`), each with its own [`StoreOutcome`].

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::catalog::{find_entry, parse_catalog};
use super::mcp_json::{McpJsonStore, build_entry, parse_env_assignments, should_add_to_mcp_json};
use super::models::{McpServerConfig, Provider, Scope, Transport};
use super::template::{ClaudeTemplate, tokenize};
use crate::config::ConfigStore;
use crate::constants::DOCKER_GATEWAY_NAME;
use crate::core::BwcError;
use crate::process::{ExternalProcessGateway, ProcessOutput, command_line};
use crate::registry::{InstallationMethod, McpServerDescriptor, MethodType};

/// Caller choices for one install.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Requested method; `None` means `bwc`
    pub method: Option<MethodType>,
    /// Target scope
    pub scope: Scope,
    /// Transport override
    pub transport: Option<Transport>,
    /// Endpoint override for remote servers
    pub url: Option<String>,
    /// `KEY=VALUE` assignments
    pub env_vars: Vec<String>,
}

/// A concrete method chosen for install.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMethod {
    /// docker, npm or manual
    pub kind: MethodType,
    /// The registry's declaration, if there was one
    pub declared: Option<InstallationMethod>,
}

/// How the server reached the Claude CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integration {
    /// `claude mcp add` succeeded
    Registered,
    /// Reached through the Docker MCP gateway; nothing registered per server
    ViaGateway,
    /// Manual configuration was printed instead
    ManualFallback {
        /// Why the CLI step was skipped or failed
        reason: String,
    },
}

/// Result of an install.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Server name
    pub name: String,
    /// Concrete method used
    pub method: MethodType,
    /// Record written to the BWC config
    pub config: McpServerConfig,
    /// Claude CLI step result
    pub integration: Integration,
    /// Whether `.mcp.json` was updated
    pub added_to_mcp_json: bool,
    /// Things the operator still has to do, in order
    pub instructions: Vec<String>,
}

/// What happened in one store during removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The entry existed and was removed
    Removed,
    /// Nothing to remove
    AlreadyAbsent,
    /// Not attempted for this provider
    Skipped,
    /// Attempted and failed
    Failed(String),
}

impl StoreOutcome {
    /// Whether the store no longer holds the entry.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        matches!(self, Self::Removed | Self::AlreadyAbsent)
    }
}

impl std::fmt::Display for StoreOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Removed => f.write_str("removed"),
            Self::AlreadyAbsent => f.write_str("not present"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of a removal, one outcome per store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// BWC config
    pub config_removed: StoreOutcome,
    /// Project `.mcp.json`
    pub mcp_json_removed: StoreOutcome,
    /// Claude CLI registration, or Docker toolkit enablement
    pub live_deregistered: StoreOutcome,
}

/// Picks the concrete method for `requested` (`None` or `bwc` means best available).
///
/// `bwc` prefers the recommended method, then docker, npm and manual in that
/// order. A server with only a `claude-cli` template (or an explicit URL) is
/// installed as manual: the template does all the work.
pub fn resolve_method(
    descriptor: &McpServerDescriptor,
    requested: Option<MethodType>,
    has_explicit_url: bool,
) -> Result<ResolvedMethod> {
    let declared = |kind| descriptor.method(kind).cloned();

    match requested {
        Some(kind) if kind.is_concrete() => {
            let available = declared(kind).is_some()
                || match kind {
                    MethodType::Docker => descriptor.sources.docker.is_some(),
                    MethodType::Npm => descriptor.sources.npm.is_some(),
                    _ => true,
                };
            if !available {
                return Err(BwcError::NoInstallMethodAvailable {
                    server: descriptor.name.clone(),
                }
                .into());
            }
            return Ok(ResolvedMethod {
                kind,
                declared: declared(kind),
            });
        }
        Some(MethodType::Bwc) | None => {}
        Some(other) => {
            return Err(BwcError::Other {
                message: format!("'{other}' is not an installable source"),
            }
            .into());
        }
    }

    if let Some(method) = descriptor.installation_methods.iter().find(|m| m.recommended && m.method_type.is_concrete())
    {
        return Ok(ResolvedMethod {
            kind: method.method_type,
            declared: Some(method.clone()),
        });
    }

    let candidates = [
        (MethodType::Docker, descriptor.sources.docker.is_some()),
        (MethodType::Npm, descriptor.sources.npm.is_some()),
        (MethodType::Manual, false),
    ];
    for (kind, has_source) in candidates {
        if has_source || descriptor.method(kind).is_some() {
            return Ok(ResolvedMethod {
                kind,
                declared: declared(kind),
            });
        }
    }

    if has_explicit_url || descriptor.claude_cli_template().is_some() || descriptor.url.is_some() {
        return Ok(ResolvedMethod {
            kind: MethodType::Manual,
            declared: None,
        });
    }

    Err(BwcError::NoInstallMethodAvailable {
        server: descriptor.name.clone(),
    }
    .into())
}

/// Splits `Name: value` header strings.
fn parse_headers(headers: &[String]) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|h| h.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

fn requests_global_install(command: &str) -> bool {
    command.contains("npm install") && command.split_whitespace().any(|w| w == "-g" || w == "--global")
}

/// Pretty-prints a config example when it is JSON, else returns it unchanged.
#[must_use]
pub fn format_manual_config(example: &str) -> String {
    serde_json::from_str::<Value>(example)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| example.to_string())
}

/// Drives installs and removals through the external tools.
pub struct ProviderReconciler<'a> {
    gateway: &'a ExternalProcessGateway,
}

impl<'a> ProviderReconciler<'a> {
    /// Reconciler using `gateway` for every external call.
    pub const fn new(gateway: &'a ExternalProcessGateway) -> Self {
        Self {
            gateway,
        }
    }

    /// Installs one server and records it.
    pub async fn install(
        &self,
        store: &mut ConfigStore,
        descriptor: &McpServerDescriptor,
        options: &InstallOptions,
    ) -> Result<InstallOutcome> {
        let name = descriptor.name.as_str();
        let url = options.url.clone().or_else(|| descriptor.url.clone());
        let resolved = resolve_method(descriptor, options.method, options.url.is_some())?;
        info!(target: "mcp", "Installing '{name}' via {}", resolved.kind);

        let mut instructions = Vec::new();
        let provider = if resolved.kind == MethodType::Docker {
            Provider::Docker
        } else {
            Provider::Claude
        };

        match resolved.kind {
            MethodType::Docker => self.install_docker(descriptor, &mut instructions).await?,
            MethodType::Npm => self.install_npm(descriptor, resolved.declared.as_ref()).await?,
            _ => {
                if let Some(method) = &resolved.declared {
                    instructions.extend(method.requirements.iter().map(|r| format!("Requirement: {r}")));
                    instructions.extend(method.steps.iter().cloned());
                }
            }
        }

        let template = match (&url, options.url.is_some(), descriptor.claude_cli_template()) {
            (Some(url), true, _) | (Some(url), false, None) => {
                let transport = options
                    .transport
                    .or_else(|| descriptor.transport())
                    .filter(|t| t.is_remote())
                    .unwrap_or(Transport::Http);
                Some(Ok(ClaudeTemplate::remote(name, transport, url)))
            }
            (_, _, Some(line)) => Some(ClaudeTemplate::parse(line)),
            (None, _, None) => None,
        };
        let template = match template {
            Some(Ok(mut t)) => {
                t.name = name.to_string();
                if let Some(transport) = options.transport {
                    t.transport = Some(transport);
                }
                Some(t)
            }
            Some(Err(e)) => {
                warn!(target: "mcp", "Ignoring unusable claude-cli template for '{name}': {e}");
                None
            }
            None => None,
        };

        let env_overrides = parse_env_assignments(&options.env_vars);
        let config = build_config(descriptor, &provider, options, template.as_ref(), &env_overrides, url);
        let example = descriptor.config_example(resolved.kind);

        let integration = if provider == Provider::Docker {
            Integration::ViaGateway
        } else {
            match &template {
                Some(t) => self.register_with_claude(name, t, options.scope, &env_overrides).await,
                None => Integration::ManualFallback {
                    reason: "the registry declares no claude-cli template".to_string(),
                },
            }
        };

        if let Integration::ManualFallback { reason } = &integration {
            warn!(target: "mcp", "Could not register '{name}' with the Claude CLI: {reason}");
            instructions.push(manual_config_block(name, &config, example.as_deref(), &options.env_vars));
        }

        store.add_installed_mcp_server(name, config.clone()).await?;

        let added_to_mcp_json = if should_add_to_mcp_json(&config) {
            let project_root = store.project_root().await?;
            McpJsonStore::new(&project_root)
                .add_server(name, &config, example.as_deref(), &options.env_vars)
                .await?;
            true
        } else {
            false
        };

        Ok(InstallOutcome {
            name: name.to_string(),
            method: resolved.kind,
            config,
            integration,
            added_to_mcp_json,
            instructions,
        })
    }

    async fn install_docker(&self, descriptor: &McpServerDescriptor, instructions: &mut Vec<String>) -> Result<()> {
        let docker = self.gateway.docker();
        docker.probe().await?;
        if let Some(image) = &descriptor.sources.docker {
            debug!(target: "mcp", "'{}' uses image {image}; Docker pulls it on first use", descriptor.name);
        }

        let catalog = match docker.catalog_show().await {
            Ok(text) => parse_catalog(&text),
            Err(e) => {
                debug!(target: "mcp", "Docker catalog unavailable: {e:#}");
                Vec::new()
            }
        };
        let catalog_name = match find_entry(&catalog, &descriptor.name, descriptor.registry_name.as_deref()) {
            Some(entry) => entry.name.clone(),
            None => {
                instructions.push(format!(
                    "'{}' was not found in the Docker MCP catalog; enable it once available: {}",
                    descriptor.name,
                    docker.enable_command(descriptor.registry_name.as_deref().unwrap_or(&descriptor.name))
                ));
                return Ok(());
            }
        };

        match docker.server_enable(&catalog_name).await {
            Ok(out) if out.success() => {
                info!(target: "mcp", "Enabled '{catalog_name}' in Docker MCP Toolkit");
            }
            Ok(out) => {
                warn!(target: "mcp", "Enabling '{catalog_name}' failed: {}", out.stderr.trim());
                instructions.push(docker.enable_command(&catalog_name));
            }
            Err(e) => {
                warn!(target: "mcp", "Enabling '{catalog_name}' failed: {e:#}");
                instructions.push(docker.enable_command(&catalog_name));
            }
        }
        Ok(())
    }

    async fn install_npm(&self, descriptor: &McpServerDescriptor, method: Option<&InstallationMethod>) -> Result<()> {
        self.gateway.probe_npm().await?;

        let Some(command) = method.and_then(|m| m.command.as_deref()).filter(|c| requests_global_install(c)) else {
            debug!(target: "mcp", "'{}' runs through npx; nothing to install now", descriptor.name);
            return Ok(());
        };

        let argv = tokenize(command)?;
        info!(target: "mcp", "Running {}", command_line(&argv[0], &argv[1..]));
        self.gateway.run_command_line(&argv).await?;
        Ok(())
    }

    async fn register_with_claude(
        &self,
        name: &str,
        template: &ClaudeTemplate,
        scope: Scope,
        env_overrides: &[(String, String)],
    ) -> Integration {
        let args = template.to_args(scope, env_overrides);
        match self.gateway.claude().exec(&args).await {
            Ok(out) if out.success() => {
                info!(target: "mcp", "Registered '{name}' with the Claude CLI ({scope} scope)");
                Integration::Registered
            }
            Ok(out) => {
                let error = BwcError::IntegrationCommandFailed {
                    command: command_line("claude", &args),
                    reason: first_line(&out),
                };
                Integration::ManualFallback {
                    reason: error.to_string(),
                }
            }
            Err(e) => Integration::ManualFallback {
                reason: e.to_string(),
            },
        }
    }

    /// Removes one server from every store it may live in.
    ///
    /// `scope` overrides the recorded scope for `claude mcp remove`.
    pub async fn remove(&self, store: &mut ConfigStore, name: &str, scope: Option<Scope>) -> Result<RemovalOutcome> {
        let recorded = store.get_mcp_server_config(name).await?;
        let catalog_name = recorded.as_ref().map_or(name, |c| c.catalog_name(name)).to_string();

        let docker = self.gateway.docker();
        let enabled = match docker.server_list().await {
            Ok(list) => list,
            Err(e) => {
                debug!(target: "mcp", "Docker server list unavailable: {e:#}");
                Vec::new()
            }
        };

        if let Some(docker_name) = enabled.iter().find(|s| **s == name || **s == catalog_name) {
            let live_deregistered = match docker.server_disable(docker_name).await {
                Ok(out) if out.success() => StoreOutcome::Removed,
                Ok(out) => StoreOutcome::Failed(first_line(&out)),
                Err(e) => StoreOutcome::Failed(e.to_string()),
            };
            let config_removed = self.remove_from_config(store, name).await;
            return Ok(RemovalOutcome {
                config_removed,
                mcp_json_removed: StoreOutcome::Skipped,
                live_deregistered,
            });
        }

        let scope = scope.or_else(|| recorded.as_ref().map(|c| c.scope)).unwrap_or_default();
        let config_removed = self.remove_from_config(store, name).await;

        let mcp_json_removed = match store.project_root().await {
            Ok(root) => match McpJsonStore::new(&root).remove_server(name).await {
                Ok(true) => StoreOutcome::Removed,
                Ok(false) => StoreOutcome::AlreadyAbsent,
                Err(e) => StoreOutcome::Failed(e.to_string()),
            },
            Err(e) => StoreOutcome::Failed(e.to_string()),
        };

        let live_deregistered = match self.gateway.claude().mcp_remove(name, scope).await {
            Ok(out) if out.success() => StoreOutcome::Removed,
            Ok(out) if is_not_found(&out) => {
                let absent = BwcError::NotFoundRemotely {
                    name: name.to_string(),
                    store: "Claude CLI".to_string(),
                };
                debug!(target: "mcp", "{absent}");
                StoreOutcome::AlreadyAbsent
            }
            Ok(out) => StoreOutcome::Failed(first_line(&out)),
            Err(e) => StoreOutcome::Failed(e.to_string()),
        };

        Ok(RemovalOutcome {
            config_removed,
            mcp_json_removed,
            live_deregistered,
        })
    }

    async fn remove_from_config(&self, store: &mut ConfigStore, name: &str) -> StoreOutcome {
        match store.remove_installed_mcp_server(name).await {
            Ok(true) => StoreOutcome::Removed,
            Ok(false) => StoreOutcome::AlreadyAbsent,
            Err(e) => StoreOutcome::Failed(format!("{e:#}")),
        }
    }

    /// Registers the Docker MCP gateway with the Claude CLI at user scope.
    ///
    /// Returns `false` when it was already registered.
    pub async fn setup_docker_gateway(&self) -> Result<bool> {
        let docker = self.gateway.docker();
        docker.probe().await?;

        let mut args = vec![
            "mcp".to_string(),
            "add".to_string(),
            DOCKER_GATEWAY_NAME.to_string(),
            "--scope".to_string(),
            Scope::User.to_string(),
            "--".to_string(),
        ];
        args.extend(docker.gateway_command());

        let out = self.gateway.claude().exec(&args).await?;
        if out.success() {
            info!(target: "mcp", "Registered {DOCKER_GATEWAY_NAME} with the Claude CLI");
            return Ok(true);
        }
        if out.combined().to_lowercase().contains("already exists") {
            return Ok(false);
        }
        Err(BwcError::IntegrationCommandFailed {
            command: command_line("claude", &args),
            reason: first_line(&out),
        }
        .into())
    }
}

fn first_line(out: &ProcessOutput) -> String {
    let text = if out.stderr.trim().is_empty() {
        &out.stdout
    } else {
        &out.stderr
    };
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("no output").trim().to_string()
}

fn is_not_found(out: &ProcessOutput) -> bool {
    let text = out.combined().to_lowercase();
    text.contains("not found") || text.contains("no mcp server") || text.contains("does not exist")
}

fn build_config(
    descriptor: &McpServerDescriptor,
    provider: &Provider,
    options: &InstallOptions,
    template: Option<&ClaudeTemplate>,
    env_overrides: &[(String, String)],
    url: Option<String>,
) -> McpServerConfig {
    let transport = options
        .transport
        .or_else(|| template.map(ClaudeTemplate::effective_transport))
        .or_else(|| descriptor.transport())
        .unwrap_or(Transport::Stdio);

    let mut config = match (transport.is_remote(), template.and_then(|t| t.url.clone()).or(url)) {
        (true, Some(url)) => McpServerConfig::remote(provider.clone(), transport, options.scope, url),
        _ => {
            let mut config = McpServerConfig::stdio(provider.clone(), options.scope);
            if *provider != Provider::Docker {
                if let Some((command, args)) = template.and_then(|t| t.command.split_first()) {
                    config.command = Some(command.clone());
                    config.args = args.to_vec();
                } else if let Some(package) = &descriptor.sources.npm {
                    config.command = Some("npx".to_string());
                    config.args = vec!["-y".to_string(), package.clone()];
                }
            }
            config
        }
    };

    if let Some(t) = template {
        config.env.extend(t.env.iter().cloned());
        if config.transport.is_remote() {
            config.headers = parse_headers(&t.headers);
        }
    }
    config.env.extend(env_overrides.iter().cloned());
    config.registry_name.clone_from(&descriptor.registry_name);
    debug_assert!(config.is_consistent(), "inconsistent record for '{}': {config:?}", descriptor.name);
    config
}

fn manual_config_block(name: &str, config: &McpServerConfig, example: Option<&str>, env_vars: &[String]) -> String {
    let body = match example {
        Some(text) => format_manual_config(text),
        None => {
            let entry = build_entry(name, config, None, env_vars).unwrap_or_default();
            let doc = serde_json::json!({ "mcpServers": { name: entry } });
            serde_json::to_string_pretty(&doc).unwrap_or_default()
        }
    };
    format!("Add this to your Claude Code MCP configuration:\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> McpServerDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_bwc_prefers_recommended() {
        let d = descriptor(json!({
            "name": "pg",
            "sources": {"docker": "mcp/pg", "npm": "pg-mcp"},
            "installationMethods": [
                {"type": "bwc"},
                {"type": "npm", "recommended": true},
                {"type": "docker"}
            ]
        }));
        assert_eq!(resolve_method(&d, None, false).unwrap().kind, MethodType::Npm);
    }

    #[test]
    fn test_bwc_priority_docker_npm_manual() {
        let d = descriptor(json!({"name": "a", "sources": {"docker": "x", "npm": "y"}}));
        assert_eq!(resolve_method(&d, Some(MethodType::Bwc), false).unwrap().kind, MethodType::Docker);

        let d = descriptor(json!({"name": "b", "sources": {"npm": "y"}}));
        assert_eq!(resolve_method(&d, None, false).unwrap().kind, MethodType::Npm);

        let d = descriptor(json!({"name": "c", "installationMethods": [{"type": "manual", "steps": ["do it"]}]}));
        let resolved = resolve_method(&d, None, false).unwrap();
        assert_eq!(resolved.kind, MethodType::Manual);
        assert_eq!(resolved.declared.unwrap().steps, vec!["do it"]);
    }

    #[test]
    fn test_bwc_only_method_is_unusable() {
        let d = descriptor(json!({"name": "loop", "installationMethods": [{"type": "bwc", "recommended": true}]}));
        let err = resolve_method(&d, None, false).unwrap_err();
        assert!(matches!(err.downcast_ref::<BwcError>(), Some(BwcError::NoInstallMethodAvailable { .. })));
    }

    #[test]
    fn test_requested_method_must_exist() {
        let d = descriptor(json!({"name": "n", "sources": {"npm": "y"}}));
        assert!(resolve_method(&d, Some(MethodType::Docker), false).is_err());
        assert_eq!(resolve_method(&d, Some(MethodType::Npm), false).unwrap().kind, MethodType::Npm);
    }

    #[test]
    fn test_explicit_url_resolves_without_methods() {
        let d = McpServerDescriptor::named("server-y");
        assert_eq!(resolve_method(&d, None, true).unwrap().kind, MethodType::Manual);
        assert!(resolve_method(&d, None, false).is_err());
    }

    #[test]
    fn test_global_install_detection() {
        assert!(requests_global_install("npm install -g @scope/server"));
        assert!(requests_global_install("npm install --global pkg"));
        assert!(!requests_global_install("npx -y pkg"));
    }

    #[test]
    fn test_format_manual_config() {
        assert_eq!(format_manual_config(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(format_manual_config("not json"), "not json");
    }

    #[test]
    fn test_build_config_from_stdio_template() {
        let d = McpServerDescriptor::named("db");
        let t = ClaudeTemplate::parse("claude mcp add db -e HOST=x -- npx -y db-mcp").unwrap();
        let options = InstallOptions {
            scope: Scope::Project,
            ..InstallOptions::default()
        };
        let overrides = vec![("HOST".to_string(), "db.local".to_string())];
        let cfg = build_config(&d, &Provider::Claude, &options, Some(&t), &overrides, None);
        assert_eq!(cfg.command.as_deref(), Some("npx"));
        assert_eq!(cfg.args, vec!["-y", "db-mcp"]);
        assert_eq!(cfg.env["HOST"], "db.local");
        assert!(cfg.is_consistent());
    }

    #[test]
    fn test_build_config_remote_has_no_command() {
        let d = McpServerDescriptor::named("api");
        let mut t = ClaudeTemplate::remote("api", Transport::Http, "https://api.example.com/mcp");
        t.headers.push("Authorization: Bearer ${TOKEN}".to_string());
        let cfg = build_config(&d, &Provider::Claude, &InstallOptions::default(), Some(&t), &[], None);
        assert_eq!(cfg.transport, Transport::Http);
        assert_eq!(cfg.headers["Authorization"], "Bearer ${TOKEN}");
        assert!(cfg.command.is_none());
        assert!(cfg.is_consistent());
    }

    #[test]
    fn test_build_config_remote_transport_without_url_stays_stdio() {
        let d = descriptor(json!({"name": "fetch", "sources": {"npm": "fetch-mcp"}}));
        let options = InstallOptions {
            transport: Some(Transport::Sse),
            ..InstallOptions::default()
        };
        let cfg = build_config(&d, &Provider::Claude, &options, None, &[], None);
        assert_eq!(cfg.transport, Transport::Stdio);
        assert!(cfg.url.is_none());
        assert_eq!(cfg.command.as_deref(), Some("npx"));
        assert!(cfg.is_consistent());
    }

    #[test]
    fn test_resolved_method_carries_declaration() {
        let d = descriptor(json!({
            "name": "notes",
            "installationMethods": [{"type": "manual", "requirements": ["Node 20"], "steps": ["clone", "build"]}]
        }));
        let expected = ResolvedMethod {
            kind: MethodType::Manual,
            declared: Some(d.installation_methods[0].clone()),
        };
        assert_eq!(resolve_method(&d, Some(MethodType::Manual), false).unwrap(), expected);
        assert_eq!(resolve_method(&d, None, false).unwrap(), expected);
    }
}
