// src/config/config_types.rs
//
// Config types for the app. Every section and key is optional in config.toml.

use crate::services::StoreOptions;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    // preview window size
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "imagesaver".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    pub max_item_extent: u32,
    pub tint_levels: u8,
    pub tint_cache_size: usize,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            max_item_extent: 512,
            tint_levels: 32,
            tint_cache_size: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub background_fade_in: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            background_fade_in: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    // pixels the mouse may drift before the saver exits
    pub mouse_move_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_move_threshold: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub lock_timeout_ms: u64,
    pub stale_lock_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5000,
            stale_lock_secs: 30,
        }
    }
}

impl StoreConfig {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            stale_after: Duration::from_secs(self.stale_lock_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    // empty means the per-user config directory
    pub store_directory: Option<String>,
}
