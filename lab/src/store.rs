//! Blob storage on disk.
//!
//! Each encoded graph is one opaque file, `<data_dir>/<name>.ser`. Every read
//! and write opens, uses and closes the file within a single call.

use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of serialized blobs.
#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob called `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.ser", name))
    }

    /// Write a blob, replacing any previous content.
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, bytes).map_err(|e| AppError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote blob");
        Ok(path)
    }

    /// Read a whole blob.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path(name);
        let bytes = fs::read(&path).map_err(|e| AppError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read blob");
        Ok(bytes)
    }
}
