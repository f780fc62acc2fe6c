//! Plugin SDK error types.

use thiserror::Error;

/// Errors raised by a [`Storage`](crate::Storage) implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error from the durable medium.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be represented by this storage engine.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Any other engine-specific failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Plugin SDK error type.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// No backend is mounted at, or registered under, the given name.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend type or mount path already registered.
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// Incompatible version.
    #[error("Incompatible version: {0}")]
    IncompatibleVersion(String),

    /// The path is root-only and the request is not privileged.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error returned by a backend while handling a request.
    #[error("{0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl PluginError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an initialization error.
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Wrap a backend-specific error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }

    /// Recover the backend-specific error, if this is one of type `E`.
    pub fn downcast_backend<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Backend(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PluginError::config("Missing storage path");
        assert_eq!(err.to_string(), "Configuration error: Missing storage path");

        let err = PluginError::NotFound("sigv4/".to_string());
        assert_eq!(err.to_string(), "Not found: sigv4/");

        let err = PluginError::from(StorageError::InvalidKey("".to_string()));
        assert_eq!(err.to_string(), "Storage error: Invalid storage key: ");
    }

    #[test]
    fn test_backend_downcast() {
        let err = PluginError::backend(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk on fire",
        ));
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.downcast_backend::<std::io::Error>().is_some());
        assert!(err.downcast_backend::<serde_json::Error>().is_none());

        let err = PluginError::config("x");
        assert!(err.downcast_backend::<std::io::Error>().is_none());
    }
}
