use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write storage file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize storage value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value store persisted as a single JSON object on disk.
///
/// Values are themselves serialized JSON strings. Every mutation rewrites the
/// whole file. A store without a path keeps its entries in memory only.
#[derive(Debug, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`. A missing or unreadable file yields an
    /// empty store.
    pub async fn open(path: &Path) -> Self {
        let entries = match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse storage file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read storage file: {err}");
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub async fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush().await
    }

    pub async fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush().await?;
        }
        Ok(())
    }

    /// Reads and parses a JSON value, treating absence and malformed data
    /// alike as `None`.
    pub fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(key, "failed to parse stored value: {err}");
                None
            }
        }
    }

    pub async fn write_json<T: serde::Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw).await
    }

    async fn flush(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(path, payload).await?;
        Ok(())
    }
}
