//! Configuration loading and persistence.

use super::{Config, StorageBackend};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from `path` (or the default path), falling back to defaults if the
    /// file does not exist. Parse errors are still reported.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let result = match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        };

        match result {
            Err(ConfigError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Directory used by the file storage backend.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.path {
            Some(path) => Ok(paths::expand_tilde(&path.to_string_lossy())),
            None => paths::storage_dir(),
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Mount path shape
        let mount = &self.mount.path;
        if mount.is_empty() {
            errors.push("Mount path must not be empty".to_string());
        } else if !mount.ends_with('/') {
            errors.push(format!("Mount path '{}' must end with '/'", mount));
        } else if mount.starts_with('/') {
            errors.push(format!("Mount path '{}' must not start with '/'", mount));
        } else {
            for segment in mount.trim_end_matches('/').split('/') {
                let valid = !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
                if !valid {
                    errors.push(format!(
                        "Mount path '{}' has an invalid segment '{}'",
                        mount, segment
                    ));
                }
            }
        }

        // 2. File storage needs a resolvable directory
        if self.storage.backend == StorageBackend::File {
            match &self.storage.path {
                Some(path) if path.as_os_str().is_empty() => {
                    errors.push("Storage path must not be empty".to_string());
                }
                Some(_) => {}
                None => {
                    if paths::storage_dir().is_err() {
                        errors.push(
                            "File storage has no path and the home directory is unknown"
                                .to_string(),
                        );
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
