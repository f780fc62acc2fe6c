//! sigvault Plugin SDK
//!
//! This crate defines the boundary between a sigvault host and the backends
//! it mounts:
//! - [`Backend`]: the trait a backend implements to serve requests
//! - [`Factory`]: the constructor a host calls to instantiate a backend
//! - [`Request`] / [`Response`]: the operation payloads
//! - [`Storage`]: the durable key/value store handed to each backend
//! - [`BackendRegistry`]: a mount table that routes requests to backends
//!
//! # Example Backend
//!
//! ```rust,ignore
//! use sigvault_plugin_sdk::prelude::*;
//!
//! pub struct EchoBackend;
//!
//! #[async_trait]
//! impl Backend for EchoBackend {
//!     fn metadata(&self) -> PluginMetadata {
//!         PluginMetadata::new("echo", Version::new(0, 1, 0), "Echoes request data")
//!     }
//!
//!     async fn handle_request(&self, req: &Request) -> Result<Option<Response>> {
//!         Ok(Some(Response::new(req.data.clone())))
//!     }
//! }
//!
//! fn factory(_ctx: &PluginContext) -> Result<Box<dyn Backend>> {
//!     Ok(Box::new(EchoBackend))
//! }
//! ```

mod data;
mod error;
mod registry;
mod request;
mod storage;

pub use data::{AttributeValue, Attributes};
pub use error::{PluginError, Result, StorageError, StorageResult};
pub use registry::BackendRegistry;
pub use request::{Operation, Request, Response};
pub use storage::{FileStorage, InmemStorage, Storage, StorageEntry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Semantic version type.
pub use semver::Version;

/// Backend metadata describing the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Backend type name (unique identifier).
    pub name: String,

    /// Backend version.
    #[serde(with = "version_serde")]
    pub version: Version,

    /// Backend description.
    pub description: String,

    /// Backend author.
    pub author: Option<String>,

    /// Backend license.
    pub license: Option<String>,

    /// Minimum required host version.
    #[serde(default, with = "option_version_serde")]
    pub min_host_version: Option<Version>,
}

impl PluginMetadata {
    /// Create metadata with only the required fields set.
    pub fn new(name: impl Into<String>, version: Version, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version,
            description: description.into(),
            author: None,
            license: None,
            min_host_version: None,
        }
    }
}

/// Serde helper for Version.
mod version_serde {
    use semver::Version;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(version: &Version, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        version.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Version, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for Option<Version>.
mod option_version_serde {
    use semver::Version;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(version: &Option<Version>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        version.as_ref().map(|v| v.to_string()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Version>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(v) => Version::parse(&v)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Paths that need special handling by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialPaths {
    /// Paths only dispatched for privileged requests. A trailing `*` makes
    /// the entry a prefix match.
    #[serde(default)]
    pub root: Vec<String>,
}

impl SpecialPaths {
    /// Whether `path` (relative to the mount) is root-only.
    pub fn is_root(&self, path: &str) -> bool {
        self.root.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => path == pattern,
        })
    }
}

/// Context passed to a [`Factory`] when a backend is mounted.
pub struct PluginContext {
    /// Host version.
    pub host_version: Version,

    /// Storage dedicated to this mount.
    pub storage: Arc<dyn Storage>,
}

impl PluginContext {
    /// Create a new plugin context.
    pub fn new(host_version: Version, storage: Arc<dyn Storage>) -> Self {
        Self {
            host_version,
            storage,
        }
    }
}

/// The trait every mountable backend implements.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the backend metadata.
    fn metadata(&self) -> PluginMetadata;

    /// Paths the host must treat specially.
    fn special_paths(&self) -> SpecialPaths {
        SpecialPaths::default()
    }

    /// Handle a request whose path is relative to the mount point.
    ///
    /// `Ok(None)` is a successful request with no payload, including reads
    /// of data that does not exist.
    async fn handle_request(&self, req: &Request) -> Result<Option<Response>>;

    /// Check backend health.
    async fn health_check(&self) -> Result<PluginHealth> {
        Ok(PluginHealth::healthy())
    }

    /// Release resources before the backend is unmounted.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// Constructor the host calls to instantiate a backend for a mount.
pub type Factory = fn(&PluginContext) -> Result<Box<dyn Backend>>;

/// Backend health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginHealth {
    /// Whether the backend is healthy.
    pub healthy: bool,

    /// Optional health message.
    pub message: Option<String>,

    /// Last check timestamp.
    pub last_check: chrono::DateTime<chrono::Utc>,
}

impl PluginHealth {
    /// Create a healthy status.
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            message: None,
            last_check: chrono::Utc::now(),
        }
    }

    /// Create an unhealthy status.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: Some(message.into()),
            last_check: chrono::Utc::now(),
        }
    }
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::{
        AttributeValue, Attributes, Backend, BackendRegistry, Factory, Operation, PluginContext,
        PluginError, PluginHealth, PluginMetadata, Request, Response, Result, SpecialPaths,
        Storage, StorageEntry, Version,
    };

    pub use async_trait::async_trait;
}
