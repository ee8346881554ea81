use predicates::prelude::*;

use crate::common::TestEnv;

const LEGACY_CONFIG: &str = r#"{
  "version": "1.0",
  "registry": "http://127.0.0.1:1/registry.json",
  "paths": { "subagents": "~/.claude/agents", "commands": "~/.claude/commands" },
  "installed": { "subagents": ["reviewer"], "commands": ["commit"], "mcpServers": ["fetch", "postgres"] }
}"#;

#[test]
fn test_list_legacy_config_leaves_file_untouched() {
    let env = TestEnv::new();
    env.write_global_config(LEGACY_CONFIG);

    env.bwc()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"))
        .stdout(predicate::str::contains("commit"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("postgres"));

    assert_eq!(std::fs::read_to_string(env.global_config()).unwrap(), LEGACY_CONFIG);
}

#[test]
fn test_list_json_shows_migrated_entries() {
    let env = TestEnv::new();
    env.write_global_config(LEGACY_CONFIG);

    let output = env.bwc().args(["list", "--mcps", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["mcpServers"]["fetch"]["provider"], "docker");
    assert_eq!(listing["mcpServers"]["postgres"]["scope"], "local");
    assert!(listing.get("subagents").is_none());
}

#[test]
fn test_user_flag_ignores_project_config() {
    let env = TestEnv::new();
    env.write_global_config(LEGACY_CONFIG);
    env.write_offline_project_config();

    let output = env.bwc().args(["list", "--agents", "--format", "json", "--user"]).output().unwrap();
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["subagents"][0], "reviewer");

    let output = env.bwc().args(["list", "--agents", "--format", "json"]).output().unwrap();
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["subagents"].as_array().unwrap().len(), 0);
}
