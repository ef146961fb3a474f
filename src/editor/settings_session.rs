// src/editor/settings_session.rs
//
// An editing session owns a working copy of the configuration. Nothing
// reaches disk until `save`, which commits staged images, writes the settings
// file and deletes the files of removed or superseded images, all under a
// single store lock.

use std::path::Path;
use tracing::{info, warn};

use super::{BehaviorEditor, EditorError, Result};
use crate::constants::validation::*;
use crate::models::{
    BackgroundMode, BackgroundScaleMode, Color, ConfigurationBehaviorType, ConfigurationImageItem,
    EmitLocation, ScreensaverConfiguration,
};
use crate::services::{ConfigurationStore, StagedImage, TempImageCache};

/// An image in the session: either already in the store or staged
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEntry {
    Stored(ConfigurationImageItem),
    Staged(StagedImage),
}

impl ImageEntry {
    pub fn original_file_name(&self) -> &str {
        match self {
            ImageEntry::Stored(item) => item.original_file_name(),
            ImageEntry::Staged(staged) => staged.original_file_name(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ImageEntry::Stored(item) => item.file_path(),
            ImageEntry::Staged(staged) => staged.staged_path(),
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, ImageEntry::Staged(_))
    }
}

pub struct SettingsSession {
    store: ConfigurationStore,
    config: ScreensaverConfiguration,
    cache: TempImageCache,
    images: Vec<ImageEntry>,
    background_image: Option<ImageEntry>,
    pending_deletions: Vec<ConfigurationImageItem>,
    dirty: bool,
}

impl SettingsSession {
    pub fn open(store: ConfigurationStore) -> Result<Self> {
        let config = store.load()?;
        let images = config.images.iter().cloned().map(ImageEntry::Stored).collect();
        let background_image = config.background_image.clone().map(ImageEntry::Stored);

        Ok(Self {
            store,
            config,
            cache: TempImageCache::new()?,
            images,
            background_image,
            pending_deletions: Vec::new(),
            dirty: false,
        })
    }

    /// The working configuration. Its image fields are rebuilt on save;
    /// use `images()` and `background_image()` while editing.
    pub fn configuration(&self) -> &ScreensaverConfiguration {
        &self.config
    }

    pub fn store(&self) -> &ConfigurationStore {
        &self.store
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ******************************* Background *******************************

    pub fn set_background_desktop(&mut self) {
        self.config.background_mode = BackgroundMode::Desktop;
        self.dirty = true;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.config.background_mode = BackgroundMode::SolidColor;
        self.config.background_color = color;
        self.dirty = true;
    }

    /// Stage a new background image; the previous one is deleted on save
    pub fn set_background_image(&mut self, path: &Path) -> Result<()> {
        let staged = self.cache.stage(path)?;
        if let Some(previous) = self.background_image.replace(ImageEntry::Staged(staged)) {
            self.drop_entry(previous);
        }
        self.config.background_mode = BackgroundMode::Image;
        self.dirty = true;
        Ok(())
    }

    pub fn set_background_scale_mode(&mut self, mode: BackgroundScaleMode) {
        self.config.background_scale_mode = mode;
        self.dirty = true;
    }

    pub fn background_image(&self) -> Option<&ImageEntry> {
        self.background_image.as_ref()
    }

    // ******************************* Emission *******************************

    pub fn set_emit_rate(&mut self, rate: f32) -> Result<()> {
        if !rate.is_finite() {
            return Err(EditorError::InvalidValue(format!("emit rate {}", rate)));
        }
        self.config.image_emit_rate = rate.clamp(MIN_EMIT_RATE, MAX_EMIT_RATE);
        self.dirty = true;
        Ok(())
    }

    pub fn set_max_emit_count(&mut self, count: u32) {
        self.config.max_emit_count = count.min(MAX_EMIT_COUNT);
        self.dirty = true;
    }

    pub fn set_emit_location(&mut self, location: EmitLocation) {
        self.config.emit_location = match location {
            EmitLocation::Custom { x, y } => EmitLocation::Custom {
                x: x.min(MAX_EMIT_COORDINATE),
                y: y.min(MAX_EMIT_COORDINATE),
            },
            other => other,
        };
        self.dirty = true;
    }

    pub fn set_custom_emit_location(&mut self, x: u32, y: u32) {
        self.set_emit_location(EmitLocation::Custom { x, y });
    }

    // ******************************* Lifetime *******************************

    pub fn set_infinite_lifetime(&mut self, infinite: bool) {
        self.config.infinite_lifetime = infinite;
        self.dirty = true;
    }

    pub fn set_lifetime_seconds(&mut self, seconds: f32) -> Result<()> {
        if !seconds.is_finite() {
            return Err(EditorError::InvalidValue(format!("lifetime {}", seconds)));
        }
        self.config.lifetime_seconds = seconds.clamp(MIN_LIFETIME, MAX_LIFETIME);
        self.config.infinite_lifetime = false;
        self.dirty = true;
        Ok(())
    }

    // ******************************* Images *******************************

    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    /// Stage an image item; returns its index
    pub fn add_image(&mut self, path: &Path) -> Result<usize> {
        let staged = self.cache.stage(path)?;
        self.images.push(ImageEntry::Staged(staged));
        self.dirty = true;
        Ok(self.images.len() - 1)
    }

    pub fn remove_image(&mut self, index: usize) -> Result<ImageEntry> {
        if index >= self.images.len() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        let entry = self.images.remove(index);
        self.drop_entry(entry.clone());
        self.dirty = true;
        Ok(entry)
    }

    // ******************************* Behaviors *******************************

    pub fn behavior_editor(&self, kind: ConfigurationBehaviorType) -> BehaviorEditor {
        BehaviorEditor::for_type(kind, self.config.behavior(kind))
    }

    pub fn apply_behavior(&mut self, editor: BehaviorEditor) {
        self.config.upsert_behavior(editor.finish());
        self.dirty = true;
    }

    pub fn remove_behavior(&mut self, kind: ConfigurationBehaviorType) -> bool {
        let removed = self.config.remove_behavior(kind).is_some();
        self.dirty |= removed;
        removed
    }

    /// Back to defaults; every image file is deleted on save
    pub fn reset(&mut self) {
        let images: Vec<ImageEntry> = self.images.drain(..).collect();
        for entry in images {
            self.drop_entry(entry);
        }
        if let Some(background) = self.background_image.take() {
            self.drop_entry(background);
        }
        self.config = ScreensaverConfiguration::default();
        self.dirty = true;
    }

    // ******************************* Persistence *******************************

    pub fn save(&mut self) -> Result<()> {
        let guard = self.store.lock()?;

        for entry in self.images.iter_mut() {
            if let ImageEntry::Staged(staged) = entry {
                let item = self.cache.commit(staged, &guard)?;
                *entry = ImageEntry::Stored(item);
            }
        }
        if let Some(ImageEntry::Staged(staged)) = &self.background_image {
            let item = self.cache.commit(staged, &guard)?;
            self.background_image = Some(ImageEntry::Stored(item));
        }

        self.config.images = self
            .images
            .iter()
            .filter_map(|entry| match entry {
                ImageEntry::Stored(item) => Some(item.clone()),
                ImageEntry::Staged(_) => None,
            })
            .collect();
        self.config.background_image = match &self.background_image {
            Some(ImageEntry::Stored(item)) => Some(item.clone()),
            _ => None,
        };
        self.config.normalize();

        guard.save(&self.config)?;

        for item in self.pending_deletions.drain(..) {
            if let Err(e) = guard.delete_image(&item) {
                warn!(path = %item.file_path().display(), error = %e, "failed to delete removed image");
            }
        }

        self.dirty = false;
        info!(images = self.config.images.len(), "settings session saved");
        Ok(())
    }

    fn drop_entry(&mut self, entry: ImageEntry) {
        match entry {
            ImageEntry::Stored(item) => self.pending_deletions.push(item),
            ImageEntry::Staged(staged) => {
                if let Err(e) = self.cache.discard(&staged) {
                    warn!(path = %staged.staged_path().display(), error = %e, "failed to discard staged image");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StoreOptions;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, ConfigurationStore, PathBuf) {
        let dir = tempdir().unwrap();
        let store = ConfigurationStore::open(dir.path().join("store"), StoreOptions::default()).unwrap();
        let source = dir.path().join("kitten.png");
        fs::write(&source, b"kitten").unwrap();
        (dir, store, source)
    }

    #[test]
    fn test_nothing_written_before_save() {
        let (_dir, store, source) = setup();
        let mut session = SettingsSession::open(store.clone()).unwrap();
        assert!(!session.is_dirty());

        session.add_image(&source).unwrap();
        session.set_emit_rate(3.0).unwrap();
        assert!(session.is_dirty());
        assert!(!store.settings_path().exists());
        assert_eq!(fs::read_dir(store.images_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_commits_staged_images() {
        let (_dir, store, source) = setup();
        let mut session = SettingsSession::open(store.clone()).unwrap();
        session.add_image(&source).unwrap();
        session.add_image(&source).unwrap();
        session.save().unwrap();

        assert!(!session.is_dirty());
        assert!(session.images().iter().all(|entry| !entry.is_staged()));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.images.len(), 2);
        for item in &loaded.images {
            assert_eq!(item.original_file_name(), "kitten.png");
            assert!(item.file_path().exists());
        }
    }

    #[test]
    fn test_removed_image_deleted_on_save() {
        let (_dir, store, source) = setup();
        let mut session = SettingsSession::open(store.clone()).unwrap();
        session.add_image(&source).unwrap();
        session.save().unwrap();

        let mut session = SettingsSession::open(store.clone()).unwrap();
        let removed = session.remove_image(0).unwrap();
        let removed_path = removed.path().to_path_buf();
        // still on disk until saved
        assert!(removed_path.exists());
        session.save().unwrap();
        assert!(!removed_path.exists());
        assert!(store.load().unwrap().images.is_empty());

        assert!(matches!(
            session.remove_image(0),
            Err(EditorError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_background_replacement_deletes_prior() {
        let (dir, store, source) = setup();
        let mut session = SettingsSession::open(store.clone()).unwrap();
        session.set_background_image(&source).unwrap();
        session.save().unwrap();
        let first = store.load().unwrap().background_image.unwrap();
        assert!(first.file_path().exists());

        let other = dir.path().join("beach.jpg");
        fs::write(&other, b"beach").unwrap();
        let mut session = SettingsSession::open(store.clone()).unwrap();
        session.set_background_image(&other).unwrap();
        session.save().unwrap();

        let config = store.load().unwrap();
        let second = config.background_image.unwrap();
        assert_eq!(config.background_mode, BackgroundMode::Image);
        assert_eq!(second.original_file_name(), "beach.jpg");
        assert!(second.file_path().exists());
        assert!(!first.file_path().exists());
    }

    #[test]
    fn test_setters_clamp_to_ranges() {
        let (_dir, store, _source) = setup();
        let mut session = SettingsSession::open(store).unwrap();
        session.set_emit_rate(-4.0).unwrap();
        session.set_max_emit_count(1_000_000);
        session.set_custom_emit_location(50, 1_000_000);
        session.set_lifetime_seconds(0.0).unwrap();
        assert!(session.set_emit_rate(f32::INFINITY).is_err());

        let config = session.configuration();
        assert_eq!(config.image_emit_rate, 0.0);
        assert_eq!(config.max_emit_count, MAX_EMIT_COUNT);
        assert_eq!(config.emit_location, EmitLocation::Custom { x: 50, y: MAX_EMIT_COORDINATE });
        assert_eq!(config.lifetime_seconds, MIN_LIFETIME);
        assert!(!config.infinite_lifetime);
    }

    #[test]
    fn test_behavior_editing_roundtrip() {
        let (_dir, store, _source) = setup();
        let mut session = SettingsSession::open(store.clone()).unwrap();

        let mut editor = session.behavior_editor(ConfigurationBehaviorType::ScaleChange);
        editor.set_duration(4.0);
        editor.set_enabled(false);
        session.apply_behavior(editor);
        session.save().unwrap();

        let session = SettingsSession::open(store).unwrap();
        let editor = session.behavior_editor(ConfigurationBehaviorType::ScaleChange);
        assert!(!editor.behavior().is_enabled());
        match editor.behavior() {
            crate::models::ConfigurationBehavior::ScaleChange(b) => assert_eq!(b.duration, 4.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_reset_deletes_everything_on_save() {
        let (_dir, store, source) = setup();
        let mut session = SettingsSession::open(store.clone()).unwrap();
        session.add_image(&source).unwrap();
        session.set_background_image(&source).unwrap();
        session.save().unwrap();
        assert_eq!(fs::read_dir(store.images_dir()).unwrap().count(), 2);

        let mut session = SettingsSession::open(store.clone()).unwrap();
        session.reset();
        session.save().unwrap();
        assert_eq!(fs::read_dir(store.images_dir()).unwrap().count(), 0);
        assert_eq!(store.load().unwrap(), ScreensaverConfiguration::default());
    }
}
