// src/config/config_load.rs
//
// loading of config.toml

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::{AnimationConfig, InputConfig, PathConfig, RenderingConfig, StoreConfig, WindowConfig};

pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub rendering: RenderingConfig,
    pub animation: AnimationConfig,
    pub input: InputConfig,
    pub store: StoreConfig,
    pub paths: PathConfig,
}

impl Config {
    /// Looks next to the executable first, then in the working directory.
    /// Without a config file the built-in defaults are used.
    pub fn load() -> Result<Self, ConfigError> {
        let candidates = [
            exe_dir().map(|dir| dir.join(CONFIG_FILENAME)),
            Some(PathBuf::from(CONFIG_FILENAME)),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                let config = Self::load_from(&path)?;
                info!(path = %path.display(), "Loaded config");
                return Ok(config);
            }
        }

        debug!("No {} found, using defaults", CONFIG_FILENAME);
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The settings store directory from `paths.store_directory`. Relative
    /// paths resolve against the executable's directory.
    pub fn resolve_store_directory(&self) -> Option<PathBuf> {
        let configured = self.paths.store_directory.as_deref()?.trim();
        if configured.is_empty() {
            return None;
        }
        let path = Path::new(configured);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        Some(match exe_dir() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        })
    }
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
