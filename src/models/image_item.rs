// src/models/image_item.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One user-supplied image: the copy kept in the settings store and the name
/// of the file the user originally picked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationImageItem {
    file_path: PathBuf,
    original_file_name: String,
}

impl ConfigurationImageItem {
    pub fn new(file_path: impl Into<PathBuf>, original_file_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            original_file_name: original_file_name.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn original_file_name(&self) -> &str {
        &self.original_file_name
    }
}
