//! File system helpers for the config and `.mcp.json` stores.
//!
//! All writes go through [`atomic_write`]: the content lands in a sibling
//! temporary file that is then renamed over the destination, so a crash never
//! leaves a half-written config behind. Reads distinguish "file absent"
//! (`Ok(None)`) from "file unreadable or malformed" (`Err`), because the
//! stores treat those two cases very differently.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Creates `path` and all missing parents.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Writes `content` to `path` atomically, creating parent directories as needed.
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent).await?;
    }

    let temp_path = temp_sibling(path);
    {
        let mut file = fs::File::create(&temp_path)
            .await
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .await
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to sync temp file: {}", temp_path.display()))?;
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        // Leave nothing behind if the rename fails.
        let _ = fs::remove_file(&temp_path).await;
        return Err(e)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()));
    }

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads a UTF-8 file, returning `None` when it does not exist.
pub async fn read_optional_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {}", path.display())),
    }
}

/// Serializes `data` as JSON and writes it atomically.
///
/// Pretty output ends with a trailing newline so the files diff cleanly.
pub async fn write_json_file<T>(path: &Path, data: &T, pretty: bool) -> Result<()>
where
    T: serde::Serialize,
{
    let mut json = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    if pretty {
        json.push('\n');
    }

    atomic_write(path, json.as_bytes())
        .await
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))
}

/// Removes a file, treating "already gone" as success.
///
/// Returns whether a file was actually deleted.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

/// Restricts a file to owner read/write on Unix. No-op elsewhere.
pub async fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read permissions for {}", path.display()))?
            .permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)
            .await
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
