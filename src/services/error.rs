// src/services/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timed out waiting for settings lock {0}")]
    LockTimeout(PathBuf),
    #[error("image not found: {0}")]
    ImageNotFound(PathBuf),
    #[error("unsupported image type: {0}")]
    UnsupportedImage(PathBuf),
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, StoreError>;
