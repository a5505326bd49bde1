//! Local filesystem storage implementation.
//!
//! Writes are plain whole-file overwrites. A file left half-written by a
//! crash fails to parse on the next start and is loaded as empty.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::AcceptedItem;
use crate::storage::ProgressStore;

/// JSON progress file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Truncate the file and write `bytes` in place.
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let mut file = tokio::fs::File::create(&self.path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(&bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProgressStore for LocalStorage {
    async fn load(&self) -> Vec<AcceptedItem> {
        match self.read_json::<Vec<AcceptedItem>>().await {
            Ok(Some(items)) => {
                log::info!(
                    "Resuming with {} previously saved items from {}",
                    items.len(),
                    self.path.display()
                );
                items
            }
            Ok(None) => {
                log::info!("No progress file at {}, starting fresh", self.path.display());
                Vec::new()
            }
            Err(e) => {
                log::warn!(
                    "Unreadable progress file {}: {}. Starting fresh.",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, items: &[AcceptedItem]) -> Result<()> {
        self.write_json(items).await
    }
}
