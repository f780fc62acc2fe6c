//! The signature backend: request handlers behind the [`Backend`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use sigvault_plugin_sdk::{
    Backend, Operation, PluginContext, PluginError, PluginHealth, PluginMetadata, Request,
    Response, SpecialPaths, Storage, Version,
};
use tracing::{debug, info};

use crate::error::{Result, SecretError};
use crate::router::{Route, Router};
use crate::signature;
use crate::store::RecordStore;
use crate::types::{DerivationContext, SECRET_ACCESS_KEY, SIGNATURE_FIELD};

/// Type name under which the backend is registered.
pub const BACKEND_TYPE: &str = "sigv4";

/// Storage key read by [`Backend::health_check`]. Contains `/`, so no routed
/// key id can name it.
const HEALTH_CHECK_KEY: &str = "sys/health-check";

/// Stores AWS-style credentials and hands out scoped signing keys.
pub struct SignatureBackend {
    store: RecordStore,
    router: Router,
}

impl SignatureBackend {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            store: RecordStore::new(storage),
            router: Router::new(),
        }
    }

    /// [`Factory`](sigvault_plugin_sdk::Factory) for [`BackendRegistry`](sigvault_plugin_sdk::BackendRegistry).
    pub fn factory(ctx: &PluginContext) -> std::result::Result<Box<dyn Backend>, PluginError> {
        Ok(Box::new(Self::new(ctx.storage.clone())))
    }

    /// Serve a request whose path is relative to the mount point.
    ///
    /// The path is routed before storage is touched.
    pub async fn handle(&self, req: &Request) -> Result<Option<Response>> {
        let route = self.router.route(&req.path)?;

        match (req.operation, route) {
            (Operation::Write, Route::Key { key_id }) => {
                self.write(&key_id, req).await?;
                Ok(None)
            }
            (Operation::Delete, Route::Key { key_id }) => {
                self.store.delete(&key_id).await?;
                info!(request_id = %req.id, key_id = %key_id, "Deleted secret");
                Ok(None)
            }
            (Operation::Read, Route::Key { key_id }) => {
                self.derive(&key_id, &DerivationContext::default()).await
            }
            (Operation::Read, Route::Signature { key_id, context }) => {
                self.derive(&key_id, &context).await
            }
            (Operation::Read, Route::Raw { key_id }) => self.raw(&key_id).await,
            (operation, _) => Err(SecretError::UnsupportedOperation {
                operation,
                path: req.path.clone(),
            }),
        }
    }

    async fn write(&self, key_id: &str, req: &Request) -> Result<()> {
        if req.data.is_empty() {
            return Err(SecretError::InvalidInput("missing data fields".to_string()));
        }

        self.store.put(key_id, &req.data).await?;
        info!(
            request_id = %req.id,
            key_id,
            fields = ?req.data,
            "Stored secret"
        );
        Ok(())
    }

    async fn derive(&self, key_id: &str, ctx: &DerivationContext) -> Result<Option<Response>> {
        let Some(record) = self.store.get(key_id).await? else {
            return Ok(None);
        };

        let secret = record.secret_access_key()?;
        let key = signature::derive(&secret, ctx);
        debug!(
            key_id,
            date = %ctx.date,
            region = %ctx.region,
            service = %ctx.service,
            "Derived signing key"
        );

        Ok(Some(Response::with_field(SIGNATURE_FIELD, key.to_base64())))
    }

    async fn raw(&self, key_id: &str) -> Result<Option<Response>> {
        let Some(record) = self.store.get(key_id).await? else {
            return Ok(None);
        };

        debug!(key_id, "Returning raw secret");
        Ok(Some(Response::with_field(
            SECRET_ACCESS_KEY,
            record.raw_secret_access_key(),
        )))
    }
}

#[async_trait]
impl Backend for SignatureBackend {
    fn metadata(&self) -> PluginMetadata {
        let version =
            Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0));
        let mut meta = PluginMetadata::new(
            BACKEND_TYPE,
            version,
            "Derives date, region, and service scoped signing keys from stored secrets",
        );
        meta.license = Some(env!("CARGO_PKG_LICENSE").to_string());
        meta
    }

    fn special_paths(&self) -> SpecialPaths {
        SpecialPaths {
            root: vec!["raw/*".to_string()],
        }
    }

    async fn handle_request(&self, req: &Request) -> sigvault_plugin_sdk::Result<Option<Response>> {
        self.handle(req).await.map_err(PluginError::from)
    }

    async fn health_check(&self) -> sigvault_plugin_sdk::Result<PluginHealth> {
        match self.store.get(HEALTH_CHECK_KEY).await {
            Ok(_) => Ok(PluginHealth::healthy()),
            Err(e) => Ok(PluginHealth::unhealthy(e.to_string())),
        }
    }
}
