//! Durable key/value storage exposed to backends.
//!
//! Defines the [`Storage`] trait and two engines: [`InmemStorage`] for
//! tests and ephemeral hosts, and [`FileStorage`], which keeps one file per
//! key under a base directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// File extension used for stored entries.
const ENTRY_EXTENSION: &str = "entry";

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    /// Storage key.
    pub key: String,
    /// Opaque value bytes.
    pub value: Vec<u8>,
}

impl StorageEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Async key/value storage.
///
/// Each `put` must be atomic: a concurrent `get` observes either the previous
/// value or the new one in full. `get` on a missing key returns `Ok(None)`
/// and `delete` on a missing key succeeds.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch an entry.
    async fn get(&self, key: &str) -> StorageResult<Option<StorageEntry>>;

    /// Store an entry, replacing any previous value.
    async fn put(&self, entry: StorageEntry) -> StorageResult<()>;

    /// Remove an entry.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}

/// In-memory storage. Contents are lost when the process exits.
pub struct InmemStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl Default for InmemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InmemStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Storage for InmemStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<StorageEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .map(|value| StorageEntry::new(key, value.clone())))
    }

    async fn put(&self, entry: StorageEntry) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.key, entry.value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// File-system-backed storage.
///
/// Each entry is stored at `{base_dir}/{hex(sha256(key))}.entry`. The name
/// is always 64 hex digits, so keys like `..` cannot escape the directory
/// and long keys stay under the file-name limit. Writes go to a
/// uniquely named temp file which is then renamed over the target, so
/// readers never see a partial value. Files are created with mode `0600`
/// on Unix.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `base_dir`. The directory is created lazily.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory holding entry files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ensure the base directory exists with restrictive permissions.
    async fn ensure_dir(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            tokio::fs::set_permissions(&self.base_dir, perms).await?;
        }

        Ok(())
    }

    fn entry_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(
                "key must not be empty".to_string(),
            ));
        }
        let digest = Sha256::digest(key.as_bytes());
        Ok(self
            .base_dir
            .join(format!("{}.{}", hex::encode(digest), ENTRY_EXTENSION)))
    }
}

/// Write `data` to `path` with mode 0600 on Unix, via temp file + rename.
async fn write_entry_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
    tokio::fs::write(&temp_path, data).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&temp_path, perms).await?;
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<StorageEntry>> {
        let path = self.entry_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(value) => Ok(Some(StorageEntry::new(key, value))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, entry: StorageEntry) -> StorageResult<()> {
        let path = self.entry_path(&entry.key)?;
        self.ensure_dir().await?;

        debug!(path = %path.display(), bytes = entry.value.len(), "writing storage entry");
        write_entry_file(&path, &entry.value).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted storage entry");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
