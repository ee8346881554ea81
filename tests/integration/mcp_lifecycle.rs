//! Add, verify and remove an MCP server against a scripted Claude CLI.
#![cfg(unix)]

use predicates::prelude::*;

use crate::common::TestEnv;

const LISTING: &str = "server-y: https://api.example.com/sse (SSE) - ✓ Connected";

#[test]
fn test_remote_server_lifecycle() {
    let env = TestEnv::new();
    env.write_offline_project_config();
    env.install_fake_claude(LISTING);

    env.bwc()
        .args([
            "add",
            "--mcp",
            "server-y",
            "--scope",
            "project",
            "--transport",
            "sse",
            "--url",
            "https://api.example.com/sse",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed MCP server 'server-y'"))
        .stdout(predicate::str::contains("Added to .mcp.json"));

    let config = env.read_json(&env.project_config());
    let entry = &config["installed"]["mcpServers"]["server-y"];
    assert_eq!(entry["provider"], "claude");
    assert_eq!(entry["transport"], "sse");
    assert_eq!(entry["scope"], "project");

    let mcp_json = env.read_json(&env.project.join(".mcp.json"));
    assert_eq!(mcp_json["mcpServers"]["server-y"]["type"], "sse");
    assert_eq!(mcp_json["mcpServers"]["server-y"]["url"], "https://api.example.com/sse");

    let output = env.bwc().args(["list", "--mcps", "--verify", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["verification"][0]["name"], "server-y");
    assert_eq!(listing["verification"][0]["actuallyInstalled"], true);
    assert_eq!(listing["verification"][0]["connectionStatus"], "connected");

    env.bwc().args(["remove", "--mcp", "server-y", "--scope", "project", "--yes"]).assert().success();

    let config = env.read_json(&env.project_config());
    assert!(config["installed"]["mcpServers"].get("server-y").is_none());
    let mcp_json = env.read_json(&env.project.join(".mcp.json"));
    assert!(mcp_json["mcpServers"].get("server-y").is_none());

    let calls = env.claude_calls();
    assert!(calls.contains(&"mcp add --scope project --transport sse server-y https://api.example.com/sse".to_string()));
    assert!(calls.contains(&"mcp remove --scope project server-y".to_string()));
}

#[test]
fn test_verification_reports_missing_server() {
    let env = TestEnv::new();
    env.install_fake_claude("other: npx other - ✓ Connected");
    env.write_global_config(
        r#"{
  "version": "1.0",
  "registry": "http://127.0.0.1:1/registry.json",
  "paths": { "subagents": "~/.claude/agents", "commands": "~/.claude/commands" },
  "installed": { "subagents": [], "commands": [], "mcpServers": {
    "fetch": { "provider": "claude", "transport": "stdio", "scope": "user", "command": "npx", "args": ["-y", "fetch"], "installedAt": "2025-01-01T00:00:00Z" }
  } }
}"#,
    );

    env.bwc()
        .args(["list", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("bwc add --mcp fetch"));

    assert_eq!(env.claude_calls(), vec!["mcp list".to_string()]);
}
