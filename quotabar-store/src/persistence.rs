//! Settings file location and atomic JSON I/O.
//!
//! The settings file may hold provider credentials, so it is written
//! owner-only on Unix and replaced atomically.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// Returns the directory holding `settings.json` and the fetcher script.
///
/// macOS uses `~/Library/Application Support/QuotaBar`; elsewhere the
/// platform config dir (`~/.config/quotabar` on Linux).
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let dir = dirs::home_dir().map(|home| home.join("Library/Application Support/QuotaBar"));
    #[cfg(not(target_os = "macos"))]
    let dir = dirs::config_dir().map(|config| config.join("quotabar"));

    dir.unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

/// Returns the default location of the quota fetcher script.
pub fn default_script_path() -> PathBuf {
    default_config_dir().join("cclimits.py")
}

#[cfg(unix)]
async fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    debug!(path = %path.display(), mode = format_args!("{mode:o}"), "Restricted permissions");
    Ok(())
}

#[cfg(not(unix))]
async fn restrict(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

/// Writes `data` as pretty JSON through `<path>.json.tmp` and a rename.
///
/// A missing parent directory is created owner-only (0700); the file
/// itself is 0600.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] or [`StoreError::Io`].
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(data)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            restrict(parent, 0o700).await?;
        }
    }

    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, json).await?;
    restrict(&staging, 0o600).await?;
    tokio::fs::rename(&staging, path).await?;

    debug!(path = %path.display(), "Saved JSON file");
    Ok(())
}

/// Reads and decodes a JSON file.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read or
/// [`StoreError::Serialization`] if it does not decode.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "Loaded JSON file");
    Ok(data)
}
