//! Local filesystem storage implementation.
//!
//! Stores the drawing database as one JSON file. Writes go to a sibling
//! `.tmp` file that is then renamed over the target.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::CacheDocument;
use crate::storage::DrawingStore;

/// JSON file storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    pretty: bool,
}

impl LocalStorage {
    /// Create a LocalStorage for the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Pretty-print the JSON on save.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        PathBuf::from(tmp)
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

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Decode a database file.
    ///
    /// Invalid JSON is fatal. Valid JSON of the wrong shape keeps only a
    /// string `modified` field.
    fn decode(&self, bytes: &[u8]) -> Result<CacheDocument> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| AppError::cache_corrupt(&self.path, e))?;

        let modified = value
            .get("modified")
            .and_then(Value::as_str)
            .map(str::to_string);

        match serde_json::from_value::<CacheDocument>(value) {
            Ok(document) => Ok(document),
            Err(e) => {
                log::warn!(
                    "Ignoring drawings in {}: unexpected layout ({})",
                    self.path.display(),
                    e
                );
                Ok(CacheDocument::new(modified, Vec::new()))
            }
        }
    }
}

#[async_trait]
impl DrawingStore for LocalStorage {
    async fn load(&self) -> Result<CacheDocument> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let document = self.decode(&bytes)?;
                log::debug!(
                    "Loaded {} drawings from {} (modified: {:?})",
                    document.drawings.len(),
                    self.path.display(),
                    document.modified
                );
                Ok(document)
            }
            None => {
                log::info!("No database at {}, starting empty", self.path.display());
                Ok(CacheDocument::default())
            }
        }
    }

    async fn save(&self, document: &CacheDocument) -> Result<()> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        self.write_bytes(&bytes).await?;
        log::debug!(
            "Wrote {} drawings to {}",
            document.drawings.len(),
            self.path.display()
        );
        Ok(())
    }
}
