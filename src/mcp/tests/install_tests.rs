use serde_json::json;

use super::{descriptor, project_harness};
use crate::core::BwcError;
use crate::mcp::{InstallOptions, Integration, McpJsonStore, Provider, ProviderReconciler, Scope, Transport};
use crate::process::ProcessOutput;
use crate::registry::{McpServerDescriptor, MethodType};

#[tokio::test]
async fn test_docker_project_install_skips_mcp_json() {
    let mut h = project_harness().await;
    h.mock.respond("docker", &["mcp", "catalog", "show"], ProcessOutput::ok("server-x: Example server\n"));

    let d = descriptor(json!({
        "name": "server-x",
        "sources": {"docker": "mcp/server-x"},
        "installationMethods": [{"type": "docker"}]
    }));
    let options = InstallOptions {
        method: Some(MethodType::Docker),
        scope: Scope::Project,
        ..InstallOptions::default()
    };

    let outcome = ProviderReconciler::new(&h.gateway).install(&mut h.store, &d, &options).await.unwrap();
    assert_eq!(outcome.method, MethodType::Docker);
    assert_eq!(outcome.integration, Integration::ViaGateway);
    assert!(!outcome.added_to_mcp_json);

    assert_eq!(h.mock.calls_matching("docker", &["mcp", "server", "enable", "server-x"]).len(), 1);
    assert!(h.mock.calls_matching("claude", &["mcp", "add"]).is_empty());

    h.store.reset();
    let recorded = h.store.get_mcp_server_config("server-x").await.unwrap().unwrap();
    assert_eq!(recorded.provider, Provider::Docker);
    assert_eq!(recorded.scope, Scope::Project);

    let mcp_json = McpJsonStore::new(&h.project).read().await.unwrap();
    assert!(mcp_json.is_none_or(|f| !f.mcp_servers.contains_key("server-x")));
}

#[tokio::test]
async fn test_docker_server_missing_from_catalog_prints_enable_command() {
    let mut h = project_harness().await;
    let d = descriptor(json!({"name": "server-x", "registryName": "x-official", "sources": {"docker": "mcp/x"}}));

    let outcome =
        ProviderReconciler::new(&h.gateway).install(&mut h.store, &d, &InstallOptions::default()).await.unwrap();
    assert!(h.mock.calls_matching("docker", &["mcp", "server", "enable"]).is_empty());
    assert!(outcome.instructions.iter().any(|i| i.contains("docker mcp server enable x-official")));
    assert_eq!(outcome.config.registry_name.as_deref(), Some("x-official"));
}

#[tokio::test]
async fn test_missing_docker_aborts_before_recording() {
    let mut h = project_harness().await;
    h.mock.missing_program("docker");
    let d = descriptor(json!({"name": "server-x", "sources": {"docker": "mcp/x"}}));

    let err = ProviderReconciler::new(&h.gateway)
        .install(&mut h.store, &d, &InstallOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<BwcError>(), Some(BwcError::PrerequisiteMissing { tool }) if tool == "docker"));
    assert!(h.store.get_installed_mcp_servers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_claude_install_registers_and_writes_mcp_json() {
    let mut h = project_harness().await;
    let options = InstallOptions {
        method: None,
        scope: Scope::Project,
        transport: Some(Transport::Sse),
        url: Some("https://api.example.com/sse".to_string()),
        env_vars: Vec::new(),
    };

    let outcome = ProviderReconciler::new(&h.gateway)
        .install(&mut h.store, &McpServerDescriptor::named("server-y"), &options)
        .await
        .unwrap();
    assert_eq!(outcome.integration, Integration::Registered);
    assert!(outcome.added_to_mcp_json);

    let calls = h.mock.calls_matching("claude", &["mcp", "add"]);
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].args,
        vec!["mcp", "add", "--scope", "project", "--transport", "sse", "server-y", "https://api.example.com/sse"]
    );

    let file = McpJsonStore::new(&h.project).read().await.unwrap().unwrap();
    let entry = &file.mcp_servers["server-y"];
    assert_eq!(entry.r#type.as_deref(), Some("sse"));
    assert_eq!(entry.url.as_deref(), Some("https://api.example.com/sse"));
}

#[tokio::test]
async fn test_failed_claude_registration_falls_back_to_manual_config() {
    let mut h = project_harness().await;
    h.mock.respond("claude", &["mcp", "add"], ProcessOutput::failed(1, "Error: something broke"));
    let d = descriptor(json!({
        "name": "fetch",
        "installationMethods": [
            {"type": "manual", "steps": ["Install uv"], "configExample": "{\"mcpServers\":{\"fetch\":{\"command\":\"uvx\"}}}"},
            {"type": "claude-cli", "command": "claude mcp add fetch -- uvx mcp-server-fetch"}
        ]
    }));
    let options = InstallOptions {
        scope: Scope::Local,
        env_vars: vec!["TIMEOUT=30".to_string()],
        ..InstallOptions::default()
    };

    let outcome = ProviderReconciler::new(&h.gateway).install(&mut h.store, &d, &options).await.unwrap();
    assert!(matches!(&outcome.integration, Integration::ManualFallback { reason } if reason.contains("something broke")));
    assert!(!outcome.added_to_mcp_json);
    assert_eq!(outcome.instructions[0], "Install uv");
    assert!(outcome.instructions.last().unwrap().contains("\"command\": \"uvx\""));

    let calls = h.mock.calls_matching("claude", &["mcp", "add"]);
    assert_eq!(
        calls[0].args,
        vec!["mcp", "add", "--scope", "local", "fetch", "-e", "TIMEOUT=30", "--", "uvx", "mcp-server-fetch"]
    );

    let recorded = h.store.get_mcp_server_config("fetch").await.unwrap().unwrap();
    assert_eq!(recorded.provider, Provider::Claude);
    assert_eq!(recorded.command.as_deref(), Some("uvx"));
    assert_eq!(recorded.env["TIMEOUT"], "30");
}

#[tokio::test]
async fn test_npm_global_install_runs_command() {
    let mut h = project_harness().await;
    let d = descriptor(json!({
        "name": "tool",
        "sources": {"npm": "@acme/tool-mcp"},
        "installationMethods": [{"type": "npm", "command": "npm install -g @acme/tool-mcp"}]
    }));

    let outcome =
        ProviderReconciler::new(&h.gateway).install(&mut h.store, &d, &InstallOptions::default()).await.unwrap();
    assert_eq!(outcome.method, MethodType::Npm);
    assert_eq!(h.mock.calls_matching("npm", &["--version"]).len(), 1);
    assert_eq!(h.mock.calls_matching("npm", &["install", "-g", "@acme/tool-mcp"]).len(), 1);
    assert_eq!(outcome.config.command.as_deref(), Some("npx"));
    assert!(matches!(outcome.integration, Integration::ManualFallback { .. }));
}

#[tokio::test]
async fn test_npx_method_defers_install() {
    let mut h = project_harness().await;
    let d = descriptor(json!({
        "name": "tool",
        "sources": {"npm": "@acme/tool-mcp"},
        "installationMethods": [{"type": "npm", "command": "npx -y @acme/tool-mcp"}]
    }));

    ProviderReconciler::new(&h.gateway).install(&mut h.store, &d, &InstallOptions::default()).await.unwrap();
    assert!(h.mock.calls_matching("npm", &["install"]).is_empty());
}

#[tokio::test]
async fn test_setup_docker_gateway() {
    let h = project_harness().await;
    let reconciler = ProviderReconciler::new(&h.gateway);
    assert!(reconciler.setup_docker_gateway().await.unwrap());

    let calls = h.mock.calls_matching("claude", &["mcp", "add", "docker-toolkit"]);
    assert_eq!(
        calls[0].args,
        vec!["mcp", "add", "docker-toolkit", "--scope", "user", "--", "docker", "mcp", "gateway", "run"]
    );

    h.mock.respond("claude", &["mcp", "add"], ProcessOutput::failed(1, "MCP server docker-toolkit already exists"));
    assert!(!reconciler.setup_docker_gateway().await.unwrap());
}
