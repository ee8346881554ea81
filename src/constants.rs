//! Global constants used throughout the BWC codebase.
//!
//! File names, environment variable names, and well-known identifiers that
//! more than one module needs live here so they stay in sync.

/// Environment variable that overrides the global config file location.
pub const CONFIG_PATH_ENV: &str = "BWC_CONFIG_PATH";

/// Environment variable that overrides home directory resolution (tests only).
pub const TEST_HOME_ENV: &str = "BWC_TEST_HOME";

/// Environment variable that disables spinners and progress output.
pub const NO_PROGRESS_ENV: &str = "BWC_NO_PROGRESS";

/// Directory under the home directory that holds the global config.
pub const GLOBAL_CONFIG_DIR: &str = ".bwc";

/// File name of the global config inside [`GLOBAL_CONFIG_DIR`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Project config file name searched for in the working directory and its ancestors.
pub const PROJECT_CONFIG_FILE: &str = "bwc.config.json";

/// Alternative project config location (`.bwc/config.json`).
pub const PROJECT_CONFIG_DIR: &str = ".bwc";

/// Project-local MCP configuration file consumed by Claude Code.
pub const MCP_JSON_FILE: &str = ".mcp.json";

/// Registry URL written into freshly initialised configs.
pub const DEFAULT_REGISTRY_URL: &str = "https://buildwithclaude.com/registry.json";

/// Config format version written by `bwc init`.
pub const CONFIG_VERSION: &str = "1.0";

/// Name under which the Docker MCP gateway is registered with the Claude CLI.
///
/// This entry is infrastructure, not a user server, and is excluded from
/// verification listings.
pub const DOCKER_GATEWAY_NAME: &str = "docker-toolkit";

/// Base name of the Claude CLI executable.
pub const CLAUDE_BINARY: &str = "claude";

/// Base name of the Docker CLI executable (WSL hosts add `.exe`).
pub const DOCKER_BINARY: &str = "docker";
