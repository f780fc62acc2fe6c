//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main sigvault configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Durable storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mount settings for the signature backend.
    #[serde(default)]
    pub mount: MountConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which storage engine backs the record store.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend. Defaults to `~/.sigvault/storage`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Storage engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Non-persistent, process-local storage.
    Memory,
    /// One file per key under a base directory.
    #[default]
    File,
}

/// Mount configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Prefix under which the signature backend is exposed, e.g. `sigv4/`.
    #[serde(default = "default_mount_path")]
    pub path: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            path: default_mount_path(),
        }
    }
}

fn default_mount_path() -> String {
    "sigv4/".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}
