// src/services/config_store.rs
//
// The settings store: settings.json plus the image copies it references.
// Every read or write happens while holding the store lock so that the saver
// and a configure session in another process never see a half-written file.

use rand::Rng;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{Result, StoreError};
use super::store_lock::StoreLock;
use crate::constants::image::is_supported;
use crate::constants::store::*;
use crate::models::{ConfigurationImageItem, ScreensaverConfiguration};

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub lock_timeout: Duration,
    pub stale_after: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            stale_after: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    root: PathBuf,
    images_dir: PathBuf,
    options: StoreOptions,
}

impl ConfigurationStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let root = root.into();
        let images_dir = root.join(IMAGES_DIR);
        fs::create_dir_all(&images_dir)?;
        debug!(root = %root.display(), "opened settings store");
        Ok(Self {
            root,
            images_dir,
            options,
        })
    }

    /// The platform default location, e.g. ~/.config/imagesaver
    pub fn default_root() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        path.push(APP_DIR);
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILENAME)
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILENAME)
    }

    /// Take the store lock for a sequence of operations
    pub fn lock(&self) -> Result<StoreGuard<'_>> {
        let lock = StoreLock::acquire(
            &self.lock_path(),
            self.options.lock_timeout,
            self.options.stale_after,
        )?;
        Ok(StoreGuard { store: self, _lock: lock })
    }

    pub fn load(&self) -> Result<ScreensaverConfiguration> {
        self.lock()?.load()
    }

    pub fn save(&self, config: &ScreensaverConfiguration) -> Result<()> {
        self.lock()?.save(config)
    }

    pub fn import_image(&self, source: &Path) -> Result<ConfigurationImageItem> {
        self.lock()?.import_image(source)
    }

    pub fn delete_image(&self, item: &ConfigurationImageItem) -> Result<bool> {
        self.lock()?.delete_image(item)
    }

    pub fn prune_orphans(&self, config: &ScreensaverConfiguration) -> Result<usize> {
        self.lock()?.prune_orphans(config)
    }

    fn unique_image_path(&self, extension: &str) -> PathBuf {
        let mut rng = rand::thread_rng();
        loop {
            let name = format!("{:016x}.{}", rng.gen::<u64>(), extension);
            let candidate = self.images_dir.join(name);
            if !candidate.exists() {
                return candidate;
            }
        }
    }

    fn owns(&self, path: &Path) -> bool {
        path.parent() == Some(self.images_dir.as_path())
    }
}

/// Store operations performed while the lock is held
pub struct StoreGuard<'a> {
    store: &'a ConfigurationStore,
    _lock: StoreLock,
}

impl StoreGuard<'_> {
    /// Read the settings file; a missing file yields the defaults
    pub fn load(&self) -> Result<ScreensaverConfiguration> {
        let path = self.store.settings_path();
        match fs::read_to_string(&path) {
            Ok(content) => {
                let mut config: ScreensaverConfiguration = serde_json::from_str(&content)?;
                config.normalize();
                info!(path = %path.display(), images = config.images.len(), behaviors = config.behaviors.len(), "loaded settings");
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file found, using defaults");
                Ok(ScreensaverConfiguration::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the settings file wholesale
    pub fn save(&self, config: &ScreensaverConfiguration) -> Result<()> {
        let path = self.store.settings_path();
        let tmp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(config)?;
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &path)?;
        info!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Copy an image into the store, remembering its original file name
    pub fn import_image(&self, source: &Path) -> Result<ConfigurationImageItem> {
        let original = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import_image_named(source, &original)
    }

    pub fn import_image_named(
        &self,
        source: &Path,
        original_file_name: &str,
    ) -> Result<ConfigurationImageItem> {
        if !source.is_file() {
            return Err(StoreError::ImageNotFound(source.to_path_buf()));
        }
        if !is_supported(source) {
            return Err(StoreError::UnsupportedImage(source.to_path_buf()));
        }

        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let destination = self.store.unique_image_path(&extension);
        fs::copy(source, &destination)?;
        info!(source = %source.display(), destination = %destination.display(), "imported image");

        Ok(ConfigurationImageItem::new(destination, original_file_name))
    }

    /// Delete an image copy. Files outside the store are never touched.
    /// Returns whether a file was removed.
    pub fn delete_image(&self, item: &ConfigurationImageItem) -> Result<bool> {
        let path = item.file_path();
        if !self.store.owns(path) {
            warn!(path = %path.display(), "refusing to delete image outside the settings store");
            return Ok(false);
        }
        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted image");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete copies in the images directory that the configuration no
    /// longer references
    pub fn prune_orphans(&self, config: &ScreensaverConfiguration) -> Result<usize> {
        let referenced: Vec<&Path> = config.referenced_images().map(|i| i.file_path()).collect();
        let mut removed = 0;

        for entry in fs::read_dir(self.store.images_dir())? {
            let path = entry?.path();
            if path.is_file() && !referenced.contains(&path.as_path()) {
                fs::remove_file(&path)?;
                debug!(path = %path.display(), "pruned orphaned image");
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "pruned orphaned images");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackgroundMode, Color, ConfigurationBehavior, ConfigurationBehaviorType, EmitLocation};
    use tempfile::tempdir;

    fn open_store(root: &Path) -> ConfigurationStore {
        ConfigurationStore::open(root, StoreOptions::default()).unwrap()
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(store.images_dir().is_dir());
        assert_eq!(store.load().unwrap(), ScreensaverConfiguration::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let mut config = ScreensaverConfiguration::default();
        config.background_mode = BackgroundMode::SolidColor;
        config.background_color = Color::rgb(10, 20, 30);
        config.emit_location = EmitLocation::Custom { x: 100, y: 200 };
        config.infinite_lifetime = true;
        config.upsert_behavior(ConfigurationBehavior::new_default(ConfigurationBehaviorType::AlphaChange));

        store.save(&config).unwrap();
        assert!(!store.settings_path().with_extension("json.tmp").exists());
        assert!(!dir.path().join(LOCK_FILENAME).exists());

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        fs::write(store.settings_path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_import_image() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir.path().join("store"));
        let source = dir.path().join("Holiday.JPG");
        fs::write(&source, b"fake jpeg").unwrap();

        let first = store.import_image(&source).unwrap();
        let second = store.import_image(&source).unwrap();

        assert_eq!(first.original_file_name(), "Holiday.JPG");
        assert_ne!(first.file_path(), second.file_path());
        assert_eq!(first.file_path().parent(), Some(store.images_dir()));
        assert_eq!(first.file_path().extension().unwrap(), "jpg");
        assert_eq!(fs::read(first.file_path()).unwrap(), b"fake jpeg");
        // the source is left alone
        assert!(source.exists());
    }

    #[test]
    fn test_import_rejects_bad_sources() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir.path().join("store"));

        let missing = dir.path().join("missing.png");
        assert!(matches!(store.import_image(&missing), Err(StoreError::ImageNotFound(_))));

        let text = dir.path().join("notes.txt");
        fs::write(&text, "hi").unwrap();
        assert!(matches!(store.import_image(&text), Err(StoreError::UnsupportedImage(_))));
    }

    #[test]
    fn test_delete_only_inside_store() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir.path().join("store"));
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();

        let item = store.import_image(&source).unwrap();
        assert!(store.delete_image(&item).unwrap());
        assert!(!item.file_path().exists());
        // second delete is a no-op
        assert!(!store.delete_image(&item).unwrap());

        let outside = ConfigurationImageItem::new(&source, "a.png");
        assert!(!store.delete_image(&outside).unwrap());
        assert!(source.exists());
    }

    #[test]
    fn test_prune_orphans() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir.path().join("store"));
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();

        let kept = store.import_image(&source).unwrap();
        let background = store.import_image(&source).unwrap();
        let orphan = store.import_image(&source).unwrap();

        let config = ScreensaverConfiguration {
            images: vec![kept.clone()],
            background_image: Some(background.clone()),
            ..Default::default()
        };

        assert_eq!(store.prune_orphans(&config).unwrap(), 1);
        assert!(kept.file_path().exists());
        assert!(background.file_path().exists());
        assert!(!orphan.file_path().exists());
    }
}
