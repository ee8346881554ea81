use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn test_init_global_config() {
    let env = TestEnv::new();

    env.bwc()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created global configuration"));

    let config = env.read_json(&env.global_config());
    assert_eq!(config["version"], "1.0");
    assert!(config["installed"]["mcpServers"].is_object());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(env.global_config()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_init_twice_requires_force() {
    let env = TestEnv::new();
    env.bwc().args(["init", "--project"]).assert().success();
    assert!(env.project_config().exists());

    env.bwc()
        .args(["init", "--project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("bwc init --force"));

    env.bwc().args(["init", "--project", "--force"]).assert().success();
}

#[test]
fn test_commands_without_config_suggest_init() {
    let env = TestEnv::new();

    env.bwc()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"))
        .stderr(predicate::str::contains("bwc init"));
}
