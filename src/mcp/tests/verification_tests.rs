use serde_json::json;
use std::collections::BTreeMap;

use super::{descriptor, project_harness};
use crate::mcp::{
    ConnectionStatus, InstallOptions, McpServerConfig, Provider, ProviderReconciler, Scope, VerificationEngine,
};
use crate::process::ProcessOutput;
use crate::registry::MethodType;

#[tokio::test]
async fn test_docker_install_then_verify_without_gateway() {
    let mut h = project_harness().await;
    let d = descriptor(json!({"name": "server-x", "sources": {"docker": "mcp/server-x"}}));
    let options = InstallOptions {
        method: Some(MethodType::Docker),
        scope: Scope::Project,
        ..InstallOptions::default()
    };
    ProviderReconciler::new(&h.gateway).install(&mut h.store, &d, &options).await.unwrap();

    let configs = h.store.get_all_mcp_server_configs().await.unwrap();
    let results = VerificationEngine::new(&h.gateway).verify_all(&configs).await.unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.configured_in_bwc);
    assert!(!result.actually_installed);
    assert!(result.verification_error.is_some());
    assert_eq!(result.fix_commands.len(), 3);
    assert_eq!(result.fix_commands[0], "bwc add --setup");
    assert_eq!(result.fix_commands[2], "docker mcp server enable server-x");
}

#[tokio::test]
async fn test_mixed_providers_query_each_listing_once() {
    let h = project_harness().await;
    h.mock.respond(
        "claude",
        &["mcp", "list"],
        ProcessOutput::ok(
            "docker-toolkit: docker mcp gateway run - ✓ Connected\n\
             api: https://api.example.com/mcp (HTTP) - ✗ Failed to connect\n",
        ),
    );
    h.mock.respond("docker", &["mcp", "server", "list"], ProcessOutput::ok("fetch, brave"));

    let mut configs = BTreeMap::new();
    configs.insert(
        "api".to_string(),
        McpServerConfig::remote(
            Provider::Claude,
            crate::mcp::Transport::Http,
            Scope::User,
            "https://api.example.com/mcp",
        ),
    );
    configs.insert("missing".to_string(), McpServerConfig::stdio(Provider::Claude, Scope::Local));
    let mut brave = McpServerConfig::stdio(Provider::Docker, Scope::Local);
    brave.registry_name = Some("brave".to_string());
    configs.insert("brave-search".to_string(), brave);
    configs.insert("postgres".to_string(), McpServerConfig::stdio(Provider::Docker, Scope::Local));
    configs.insert("odd".to_string(), McpServerConfig::stdio(Provider::Other("podman".to_string()), Scope::Local));
    configs.insert("docker-toolkit".to_string(), McpServerConfig::stdio(Provider::Claude, Scope::User));

    let results = VerificationEngine::new(&h.gateway).verify_all(&configs).await.unwrap();
    let by_name: BTreeMap<_, _> = results.iter().map(|r| (r.name.as_str(), r)).collect();

    let api = by_name["api"];
    assert!(api.actually_installed);
    assert_eq!(api.connection_status, ConnectionStatus::Error);
    assert!(api.fix_commands.is_empty());

    let missing = by_name["missing"];
    assert!(!missing.actually_installed);
    assert_eq!(missing.fix_commands, vec!["bwc add --mcp missing"]);

    let brave = by_name["brave-search"];
    assert!(brave.actually_installed);
    assert_eq!(brave.connection_status, ConnectionStatus::Connected);

    assert_eq!(by_name["postgres"].fix_commands, vec!["docker mcp server enable postgres"]);
    assert!(by_name["odd"].verification_error.as_deref().unwrap().contains("podman"));
    assert!(!by_name["docker-toolkit"].actually_installed);

    assert_eq!(h.mock.calls_matching("claude", &["mcp", "list"]).len(), 1);
    assert_eq!(h.mock.calls_matching("docker", &["mcp", "server", "list"]).len(), 1);
}

#[tokio::test]
async fn test_verification_performs_no_writes() {
    let h = project_harness().await;
    let mut configs = BTreeMap::new();
    configs.insert("x".to_string(), McpServerConfig::stdio(Provider::Claude, Scope::Project));

    VerificationEngine::new(&h.gateway).verify_all(&configs).await.unwrap();

    for call in h.mock.calls() {
        assert!(call.args.first().is_none_or(|a| a == "mcp"));
        assert!(!call.args.iter().any(|a| a == "add" || a == "remove" || a == "enable" || a == "disable"));
    }
    assert!(!h.project.join(".mcp.json").exists());
}
