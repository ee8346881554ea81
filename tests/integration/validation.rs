use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn test_invalid_scope_has_no_side_effects() {
    let env = TestEnv::new();

    env.bwc()
        .args(["add", "--mcp", "server-x", "--scope", "global"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scope 'global'"));

    assert!(!env.global_config().exists());
    assert!(!env.project_config().exists());
    assert!(!env.project.join(".mcp.json").exists());
}

#[test]
fn test_invalid_transport_is_rejected() {
    let env = TestEnv::new();
    env.write_offline_project_config();

    env.bwc()
        .args(["add", "--mcp", "server-x", "--transport", "websocket"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("websocket"));
}

#[test]
fn test_add_requires_a_target() {
    let env = TestEnv::new();
    env.bwc().arg("add").assert().failure();
    env.bwc().args(["add", "--agent", "a", "--mcp", "b"]).assert().failure();
}

#[test]
fn test_registry_unreachable_without_url() {
    let env = TestEnv::new();
    env.write_offline_project_config();

    env.bwc()
        .args(["add", "--mcp", "postgres"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("internet connection"));
}
