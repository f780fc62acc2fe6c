//! Mount table that instantiates backends and routes requests to them.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn, Instrument};

use crate::{
    Backend, Factory, PluginContext, PluginError, PluginMetadata, Request, Response, Result,
    SpecialPaths,
};

/// A backend instance mounted at a path prefix.
struct MountEntry {
    backend_type: String,
    backend: Box<dyn Backend>,
    special_paths: SpecialPaths,
}

/// Registry of backend factories and mounted instances.
///
/// Mount paths are prefixes ending in `/`. A request path is routed to the
/// longest matching mount; the mount prefix is stripped before the backend
/// sees the request.
#[derive(Default)]
pub struct BackendRegistry {
    factories: HashMap<String, Factory>,
    mounts: BTreeMap<String, MountEntry>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend type.
    pub fn register_factory(&mut self, backend_type: impl Into<String>, factory: Factory) -> Result<()> {
        let backend_type = backend_type.into();
        if self.factories.contains_key(&backend_type) {
            return Err(PluginError::AlreadyRegistered(backend_type));
        }
        self.factories.insert(backend_type, factory);
        Ok(())
    }

    /// Instantiate `backend_type` and mount it at `path`.
    pub fn mount(
        &mut self,
        backend_type: &str,
        path: impl Into<String>,
        ctx: &PluginContext,
    ) -> Result<PluginMetadata> {
        let path = path.into();
        if path.is_empty() || !path.ends_with('/') {
            return Err(PluginError::config(format!(
                "mount path '{}' must be non-empty and end with '/'",
                path
            )));
        }
        if self.mounts.contains_key(&path) {
            return Err(PluginError::AlreadyRegistered(path));
        }

        let factory = self
            .factories
            .get(backend_type)
            .ok_or_else(|| PluginError::NotFound(backend_type.to_string()))?;

        let backend = factory(ctx)?;
        let metadata = backend.metadata();

        if let Some(min) = &metadata.min_host_version {
            if ctx.host_version < *min {
                return Err(PluginError::IncompatibleVersion(format!(
                    "{} requires host {} or newer, running {}",
                    metadata.name, min, ctx.host_version
                )));
            }
        }

        info!(
            backend = %metadata.name,
            version = %metadata.version,
            mount = %path,
            "Mounted backend"
        );

        let special_paths = backend.special_paths();
        self.mounts.insert(
            path,
            MountEntry {
                backend_type: backend_type.to_string(),
                backend,
                special_paths,
            },
        );

        Ok(metadata)
    }

    /// Shut down and remove the backend mounted at `path`.
    pub async fn unmount(&mut self, path: &str) -> Result<()> {
        let entry = self
            .mounts
            .remove(path)
            .ok_or_else(|| PluginError::NotFound(path.to_string()))?;

        info!(mount = %path, backend = %entry.backend_type, "Unmounting backend");
        entry.backend.shutdown().await
    }

    /// List mount paths with the backend type mounted there.
    pub fn mounts(&self) -> Vec<(String, String)> {
        self.mounts
            .iter()
            .map(|(path, entry)| (path.clone(), entry.backend_type.clone()))
            .collect()
    }

    fn resolve(&self, path: &str) -> Option<(&str, &MountEntry)> {
        // BTreeMap iterates in order; the last match is the longest prefix.
        self.mounts
            .iter()
            .filter(|(mount, _)| path.starts_with(mount.as_str()))
            .last()
            .map(|(mount, entry)| (mount.as_str(), entry))
    }

    /// Route `req` to the backend whose mount prefixes `req.path`.
    pub async fn handle_request(&self, req: &Request) -> Result<Option<Response>> {
        let (mount, entry) = self
            .resolve(&req.path)
            .ok_or_else(|| PluginError::NotFound(format!("no mount for path '{}'", req.path)))?;

        let relative = &req.path[mount.len()..];
        if entry.special_paths.is_root(relative) && !req.privileged {
            warn!(
                request_id = %req.id,
                mount,
                path = relative,
                "Rejected unprivileged request to root path"
            );
            return Err(PluginError::PermissionDenied(req.path.clone()));
        }

        let mut routed = req.clone();
        routed.path = relative.to_string();

        let span = tracing::debug_span!(
            "request",
            request_id = %req.id,
            operation = %req.operation,
            mount,
        );

        async {
            debug!(path = relative, "Dispatching request");
            let result = entry.backend.handle_request(&routed).await;
            if let Err(e) = &result {
                debug!(error = %e, "Request failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Shut down every mounted backend.
    pub async fn shutdown_all(&mut self) -> Result<()> {
        for (path, entry) in std::mem::take(&mut self.mounts) {
            info!(mount = %path, "Shutting down backend");
            if let Err(e) = entry.backend.shutdown().await {
                warn!(mount = %path, "Error shutting down backend: {}", e);
            }
        }
        Ok(())
    }
}
