use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::config::{ConfigLocations, ConfigStore};
use crate::process::{ClaudeCli, DockerCli, ExternalProcessGateway, ProcessRunner};
use crate::registry::McpServerDescriptor;
use crate::test_utils::{MockRunner, init_test_logging};

/// A project directory with an initialised project config and scripted tools.
pub(crate) struct Harness {
    pub _temp: TempDir,
    pub project: PathBuf,
    pub mock: Arc<MockRunner>,
    pub gateway: ExternalProcessGateway,
    pub store: ConfigStore,
}

pub(crate) async fn project_harness() -> Harness {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let project = temp.path().join("project");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&project).unwrap();

    let mut store = ConfigStore::new(ConfigLocations::new(&home, &project));
    store.init(true, false).await.unwrap();

    let mock = Arc::new(MockRunner::new());
    let runner: Arc<dyn ProcessRunner> = mock.clone();
    let gateway = ExternalProcessGateway::new(
        Arc::clone(&runner),
        ClaudeCli::with_binary(Arc::clone(&runner), "claude"),
        DockerCli::with_binary(runner, "docker"),
    );

    Harness {
        _temp: temp,
        project,
        mock,
        gateway,
        store,
    }
}

pub(crate) fn descriptor(value: serde_json::Value) -> McpServerDescriptor {
    serde_json::from_value(value).unwrap()
}

mod install_tests;
mod verification_tests;
