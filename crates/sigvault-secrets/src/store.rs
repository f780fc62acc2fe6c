//! Record persistence on top of the host-provided [`Storage`].
//!
//! Each record is stored under its key ID as the JSON encoding of its
//! attribute bag.

use std::sync::Arc;

use sigvault_plugin_sdk::{Attributes, Storage, StorageEntry};
use tracing::debug;

use crate::error::{Result, SecretError};
use crate::types::SecretRecord;

/// Reads and writes [`SecretRecord`]s.
#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<dyn Storage>,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Store `attributes` under `key_id`, replacing any existing record.
    pub async fn put(&self, key_id: &str, attributes: &Attributes) -> Result<()> {
        let value = serde_json::to_vec(attributes).map_err(|source| SecretError::Encode {
            key: key_id.to_string(),
            source,
        })?;

        self.storage
            .put(StorageEntry::new(key_id, value))
            .await
            .map_err(|source| SecretError::Storage {
                operation: "put",
                key: key_id.to_string(),
                source,
            })?;

        debug!(key_id, fields = attributes.len(), "Stored record");
        Ok(())
    }

    /// Load the record stored under `key_id`, if any.
    pub async fn get(&self, key_id: &str) -> Result<Option<SecretRecord>> {
        let entry = self
            .storage
            .get(key_id)
            .await
            .map_err(|source| SecretError::Storage {
                operation: "get",
                key: key_id.to_string(),
                source,
            })?;

        let Some(entry) = entry else {
            debug!(key_id, "No record");
            return Ok(None);
        };

        let attributes: Attributes =
            serde_json::from_slice(&entry.value).map_err(|source| SecretError::Decode {
                key: key_id.to_string(),
                source,
            })?;

        Ok(Some(SecretRecord::new(key_id, attributes)))
    }

    /// Remove the record under `key_id`. Removing a missing record succeeds.
    pub async fn delete(&self, key_id: &str) -> Result<()> {
        self.storage
            .delete(key_id)
            .await
            .map_err(|source| SecretError::Storage {
                operation: "delete",
                key: key_id.to_string(),
                source,
            })?;

        debug!(key_id, "Deleted record");
        Ok(())
    }
}
