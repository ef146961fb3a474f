//! Application-wide constants
//!
//! Value ranges shared by settings normalization and the editors, plus the
//! on-disk layout of the settings store.

/// Valid ranges for persisted settings
pub mod validation {
    /// Emissions per second
    pub const MIN_EMIT_RATE: f32 = 0.0;
    pub const MAX_EMIT_RATE: f32 = 100.0;

    /// Population cap for live image items
    pub const MAX_EMIT_COUNT: u32 = 500;

    /// Finite item lifetime, in seconds
    pub const MIN_LIFETIME: f32 = 0.1;
    pub const MAX_LIFETIME: f32 = 3600.0;

    /// Custom emit location coordinates, in screen pixels
    pub const MAX_EMIT_COORDINATE: u32 = 16384;

    /// Behavior and end transition durations, in seconds
    pub const MAX_BEHAVIOR_DURATION: f32 = 600.0;

    /// Scale behavior multiplier
    pub const MIN_SCALE: f32 = 0.01;
    pub const MAX_SCALE: f32 = 20.0;

    /// Rotation behavior angle, in degrees
    pub const MAX_ROTATION: f32 = 36000.0;
}

/// Settings store layout
pub mod store {
    /// Directory created under the platform config dir
    pub const APP_DIR: &str = "imagesaver";

    pub const SETTINGS_FILENAME: &str = "settings.json";

    pub const LOCK_FILENAME: &str = "settings.lock";

    pub const IMAGES_DIR: &str = "images";

    /// Poll interval while waiting for another process to release the lock
    pub const LOCK_RETRY_MS: u64 = 25;
}

/// Image files accepted as image items or background images
pub mod image {
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

    /// Background images are downscaled past this size, in pixels
    pub const MAX_BACKGROUND_EXTENT: u32 = 8192;

    pub fn is_supported(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}
