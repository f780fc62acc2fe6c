//! In-process host: builds storage from config and mounts the signature backend.

use std::sync::Arc;

use anyhow::Context;
use sigvault_core::config::{Config, StorageBackend};
use sigvault_plugin_sdk::{
    BackendRegistry, FileStorage, InmemStorage, PluginContext, Request, Response, Storage,
    Version,
};
use sigvault_secrets::{SignatureBackend, BACKEND_TYPE};
use tracing::{debug, warn};

/// A registry with the signature backend mounted at the configured path.
pub struct Host {
    registry: BackendRegistry,
    mount: String,
}

impl Host {
    /// Validate `config`, open its storage, and mount the backend.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        config.validate().context("Configuration error")?;

        let storage: Arc<dyn Storage> = match config.storage.backend {
            StorageBackend::Memory => {
                warn!("Using in-memory storage; nothing will persist after exit");
                Arc::new(InmemStorage::new())
            }
            StorageBackend::File => {
                let dir = config.storage_dir()?;
                debug!(dir = %dir.display(), "Using file storage");
                Arc::new(FileStorage::new(dir))
            }
        };

        let host_version = Version::parse(env!("CARGO_PKG_VERSION"))?;
        let ctx = PluginContext::new(host_version, storage);

        let mut registry = BackendRegistry::new();
        registry.register_factory(BACKEND_TYPE, SignatureBackend::factory)?;
        registry.mount(BACKEND_TYPE, config.mount.path.as_str(), &ctx)?;

        Ok(Self {
            registry,
            mount: config.mount.path.clone(),
        })
    }

    /// Send `req` to the mounted backend. `req.path` is relative to the mount.
    ///
    /// Failures keep the [`PluginError`](sigvault_plugin_sdk::PluginError) so
    /// callers can downcast it.
    pub async fn send(&self, mut req: Request) -> anyhow::Result<Option<Response>> {
        req.path = format!("{}{}", self.mount, req.path);
        let resp = self.registry.handle_request(&req).await?;
        Ok(resp)
    }

    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.registry.shutdown_all().await?;
        Ok(())
    }
}
