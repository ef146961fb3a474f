// src/services/image_cache.rs
//
// Staging area for images picked during an editing session. Copies live in a
// private temp directory until the session is saved; anything not committed
// disappears with the cache.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

use super::config_store::StoreGuard;
use super::error::{Result, StoreError};
use crate::constants::image::is_supported;
use crate::models::ConfigurationImageItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    staged_path: PathBuf,
    original_file_name: String,
}

impl StagedImage {
    pub fn staged_path(&self) -> &Path {
        &self.staged_path
    }

    pub fn original_file_name(&self) -> &str {
        &self.original_file_name
    }
}

#[derive(Debug)]
pub struct TempImageCache {
    dir: TempDir,
    next_id: u64,
}

impl TempImageCache {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("imagesaver-").tempdir()?;
        Ok(Self { dir, next_id: 0 })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `source` into the cache
    pub fn stage(&mut self, source: &Path) -> Result<StagedImage> {
        if !source.is_file() {
            return Err(StoreError::ImageNotFound(source.to_path_buf()));
        }
        if !is_supported(source) {
            return Err(StoreError::UnsupportedImage(source.to_path_buf()));
        }

        let original_file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let staged_path = self.dir.path().join(format!("staged-{}.{}", self.next_id, extension));
        self.next_id += 1;
        fs::copy(source, &staged_path)?;
        debug!(source = %source.display(), staged = %staged_path.display(), "staged image");

        Ok(StagedImage {
            staged_path,
            original_file_name,
        })
    }

    /// Move a staged copy into the store
    pub fn commit(&self, staged: &StagedImage, store: &StoreGuard<'_>) -> Result<ConfigurationImageItem> {
        let item = store.import_image_named(&staged.staged_path, &staged.original_file_name)?;
        fs::remove_file(&staged.staged_path)?;
        Ok(item)
    }

    pub fn discard(&self, staged: &StagedImage) -> Result<()> {
        match fs::remove_file(&staged.staged_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
