//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the sigvault base directory (~/.sigvault).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".sigvault"))
}

/// Get the main config file path (~/.sigvault/sigvault.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("sigvault.json5"))
}

/// Get the default file storage directory (~/.sigvault/storage).
pub fn storage_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("storage"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
