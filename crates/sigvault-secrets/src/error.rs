//! Error types for the signature backend.

use sigvault_plugin_sdk::{Operation, PluginError, StorageError};
use thiserror::Error;

/// Errors that can occur while serving a request.
///
/// A record that does not exist is not an error; reads of missing records
/// return an empty result instead.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The request is missing required data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The path does not match any known shape.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The path is valid but does not accept this operation.
    #[error("Unsupported operation: {operation} on '{path}'")]
    UnsupportedOperation { operation: Operation, path: String },

    /// The underlying storage failed.
    #[error("Storage error during {operation} of '{key}': {source}")]
    Storage {
        operation: &'static str,
        key: String,
        source: StorageError,
    },

    /// A stored record could not be parsed.
    #[error("Failed to decode record '{key}': {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    /// A record could not be serialized for storage.
    #[error("Failed to encode record '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// A stored record lacks a field needed for the request.
    #[error("Malformed record '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },
}

impl From<SecretError> for PluginError {
    fn from(err: SecretError) -> Self {
        PluginError::backend(err)
    }
}

/// Convenience result alias for backend operations.
pub type Result<T> = std::result::Result<T, SecretError>;
