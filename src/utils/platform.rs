//! Platform detection and path helpers.
//!
//! The interesting platform quirk for BWC is WSL: inside Windows Subsystem for
//! Linux the Docker CLI is usually the Windows binary exposed as `docker.exe`,
//! so every Docker invocation has to use that name. Detection checks the
//! `WSL_DISTRO_NAME` marker first and falls back to the kernel version text.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::DOCKER_BINARY;

/// Environment variable set by WSL in every distribution shell.
const WSL_ENV_MARKER: &str = "WSL_DISTRO_NAME";

/// Kernel version file inspected when the environment marker is absent.
const KERNEL_VERSION_PATH: &str = "/proc/version";

/// Returns the user's home directory.
///
/// # Errors
///
/// Fails when the platform reports no home directory (for example `HOME` unset).
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if cfg!(windows) {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Expands a leading `~` against `home`.
///
/// Only the current user's home is supported (`~` and `~/...`); everything
/// else is returned untouched.
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    let expanded = shellexpand::tilde_with_context(path, || Some(home.to_string_lossy()));
    PathBuf::from(expanded.as_ref())
}

/// Pure WSL detection over the two signals.
///
/// `env_marker` is the value of `WSL_DISTRO_NAME`, `kernel_version` the
/// contents of `/proc/version`.
#[must_use]
pub fn detect_wsl(env_marker: Option<&str>, kernel_version: Option<&str>) -> bool {
    if env_marker.is_some_and(|v| !v.trim().is_empty()) {
        return true;
    }

    kernel_version.is_some_and(|text| {
        let lower = text.to_lowercase();
        lower.contains("microsoft") || lower.contains("wsl")
    })
}

/// Detects whether the process runs inside WSL.
#[must_use]
pub fn is_wsl() -> bool {
    let marker = std::env::var(WSL_ENV_MARKER).ok();
    if detect_wsl(marker.as_deref(), None) {
        return true;
    }
    if !cfg!(target_os = "linux") {
        return false;
    }
    let kernel = std::fs::read_to_string(KERNEL_VERSION_PATH).ok();
    detect_wsl(None, kernel.as_deref())
}

/// Docker binary name for a host, `docker.exe` on WSL.
#[must_use]
pub fn docker_command_for(wsl: bool) -> String {
    if wsl {
        format!("{DOCKER_BINARY}.exe")
    } else {
        DOCKER_BINARY.to_string()
    }
}

/// Docker binary name for the current host.
#[must_use]
pub fn docker_command() -> String {
    docker_command_for(is_wsl())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_wsl_from_env_marker() {
        assert!(detect_wsl(Some("Ubuntu"), None));
        assert!(!detect_wsl(Some("  "), None));
    }

    #[test]
    fn test_detect_wsl_from_kernel_version() {
        let wsl2 = "Linux version 5.15.133.1-microsoft-standard-WSL2 (root@1c602f52c2e4)";
        assert!(detect_wsl(None, Some(wsl2)));

        let wsl1 = "Linux version 4.4.0-19041-Microsoft (Microsoft@Microsoft.com)";
        assert!(detect_wsl(None, Some(wsl1)));

        let native = "Linux version 6.8.0-45-generic (buildd@lcy02-amd64-075)";
        assert!(!detect_wsl(None, Some(native)));
        assert!(!detect_wsl(None, None));
    }

    #[test]
    fn test_docker_command_for() {
        assert_eq!(docker_command_for(true), "docker.exe");
        assert_eq!(docker_command_for(false), "docker");
    }

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/home/tester");
        assert_eq!(expand_tilde("~/.claude/agents", home), PathBuf::from("/home/tester/.claude/agents"));
        assert_eq!(expand_tilde("~", home), PathBuf::from("/home/tester"));
        assert_eq!(expand_tilde("relative/dir", home), PathBuf::from("relative/dir"));
        assert_eq!(expand_tilde("/abs/dir", home), PathBuf::from("/abs/dir"));
    }
}
