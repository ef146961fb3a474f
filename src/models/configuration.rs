// src/models/configuration.rs
// the persisted screensaver settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::{Color, ConfigurationBehavior, ConfigurationBehaviorType, ConfigurationImageItem};
use crate::constants::validation::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundMode {
    #[default]
    Desktop,
    SolidColor,
    Image,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundScaleMode {
    #[default]
    Stretch,
    Center,
    Tile,
    /// Scale to fit inside the screen, preserving aspect ratio
    Fit,
    /// Scale to cover the screen, preserving aspect ratio
    Fill,
}

impl FromStr for BackgroundScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stretch" => Ok(BackgroundScaleMode::Stretch),
            "center" => Ok(BackgroundScaleMode::Center),
            "tile" => Ok(BackgroundScaleMode::Tile),
            "fit" => Ok(BackgroundScaleMode::Fit),
            "fill" => Ok(BackgroundScaleMode::Fill),
            other => Err(format!(
                "unknown scale mode '{}', expected stretch, center, tile, fit or fill",
                other
            )),
        }
    }
}

/// Where new image items appear
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum EmitLocation {
    #[default]
    Random,
    Center,
    /// Screen pixels, origin at the top-left corner
    Custom { x: u32, y: u32 },
}

impl fmt::Display for EmitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitLocation::Random => f.write_str("random"),
            EmitLocation::Center => f.write_str("center"),
            EmitLocation::Custom { x, y } => write!(f, "custom ({}, {})", x, y),
        }
    }
}

fn default_background_color() -> Color {
    Color::BLACK
}

fn default_emit_rate() -> f32 {
    1.0
}

fn default_max_emit_count() -> u32 {
    25
}

fn default_lifetime_seconds() -> f32 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreensaverConfiguration {
    pub background_mode: BackgroundMode,
    pub background_color: Color,
    pub background_image: Option<ConfigurationImageItem>,
    pub background_scale_mode: BackgroundScaleMode,

    /// Emissions per second
    pub image_emit_rate: f32,
    /// Cap on live items; retiring items keep their slot until they die
    pub max_emit_count: u32,
    pub emit_location: EmitLocation,

    pub infinite_lifetime: bool,
    pub lifetime_seconds: f32,

    pub images: Vec<ConfigurationImageItem>,
    pub behaviors: Vec<ConfigurationBehavior>,
}

impl Default for ScreensaverConfiguration {
    fn default() -> Self {
        Self {
            background_mode: BackgroundMode::default(),
            background_color: default_background_color(),
            background_image: None,
            background_scale_mode: BackgroundScaleMode::default(),
            image_emit_rate: default_emit_rate(),
            max_emit_count: default_max_emit_count(),
            emit_location: EmitLocation::default(),
            infinite_lifetime: false,
            lifetime_seconds: default_lifetime_seconds(),
            images: Vec::new(),
            behaviors: Vec::new(),
        }
    }
}

impl ScreensaverConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item lifetime in seconds, or None when items live until retired
    pub fn lifetime(&self) -> Option<f32> {
        if self.infinite_lifetime {
            None
        } else {
            Some(self.lifetime_seconds)
        }
    }

    pub fn behavior(&self, kind: ConfigurationBehaviorType) -> Option<&ConfigurationBehavior> {
        self.behaviors.iter().find(|b| b.kind() == kind)
    }

    /// Insert a behavior, replacing any existing one of the same type
    pub fn upsert_behavior(&mut self, behavior: ConfigurationBehavior) {
        let kind = behavior.kind();
        match self.behaviors.iter_mut().find(|b| b.kind() == kind) {
            Some(existing) => *existing = behavior,
            None => self.behaviors.push(behavior),
        }
    }

    pub fn remove_behavior(&mut self, kind: ConfigurationBehaviorType) -> Option<ConfigurationBehavior> {
        let index = self.behaviors.iter().position(|b| b.kind() == kind)?;
        Some(self.behaviors.remove(index))
    }

    pub fn enabled_behaviors(&self) -> impl Iterator<Item = &ConfigurationBehavior> {
        self.behaviors.iter().filter(|b| b.is_enabled())
    }

    /// Enforce one behavior per type and pull numeric fields into range.
    /// Called on everything read from disk.
    pub fn normalize(&mut self) {
        let mut unique: Vec<ConfigurationBehavior> = Vec::with_capacity(self.behaviors.len());
        for behavior in self.behaviors.drain(..) {
            if let Some(existing) = unique.iter_mut().find(|b| b.kind() == behavior.kind()) {
                warn!(behavior = %behavior.kind(), "duplicate behavior in settings, keeping the last one");
                *existing = behavior;
            } else {
                unique.push(behavior);
            }
        }
        for behavior in unique.iter_mut() {
            behavior.clamp_values();
        }
        self.behaviors = unique;

        if !self.image_emit_rate.is_finite() {
            warn!(rate = self.image_emit_rate, "invalid emit rate, using default");
            self.image_emit_rate = default_emit_rate();
        }
        if self.image_emit_rate < MIN_EMIT_RATE || self.image_emit_rate > MAX_EMIT_RATE {
            warn!(rate = self.image_emit_rate, max = MAX_EMIT_RATE, "emit rate out of range, clamping");
            self.image_emit_rate = self.image_emit_rate.clamp(MIN_EMIT_RATE, MAX_EMIT_RATE);
        }

        if self.max_emit_count > MAX_EMIT_COUNT {
            warn!(max_emit_count = self.max_emit_count, max = MAX_EMIT_COUNT, "max emit count exceeds maximum, clamping");
            self.max_emit_count = MAX_EMIT_COUNT;
        }

        if !self.lifetime_seconds.is_finite() {
            self.lifetime_seconds = default_lifetime_seconds();
        }
        if self.lifetime_seconds < MIN_LIFETIME || self.lifetime_seconds > MAX_LIFETIME {
            warn!(lifetime = self.lifetime_seconds, "lifetime out of range, clamping");
            self.lifetime_seconds = self.lifetime_seconds.clamp(MIN_LIFETIME, MAX_LIFETIME);
        }

        if let EmitLocation::Custom { x, y } = self.emit_location {
            self.emit_location = EmitLocation::Custom {
                x: x.min(MAX_EMIT_COORDINATE),
                y: y.min(MAX_EMIT_COORDINATE),
            };
        }

        if self.background_mode == BackgroundMode::Image && self.background_image.is_none() {
            warn!("image background selected without an image, falling back to solid color");
            self.background_mode = BackgroundMode::SolidColor;
        }
    }

    /// Every image file this configuration references
    pub fn referenced_images(&self) -> impl Iterator<Item = &ConfigurationImageItem> {
        self.images.iter().chain(self.background_image.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyBehavior;

    #[test]
    fn test_defaults() {
        let config = ScreensaverConfiguration::new();
        assert_eq!(config.background_mode, BackgroundMode::Desktop);
        assert_eq!(config.lifetime(), Some(10.0));
        assert!(config.images.is_empty());
        assert!(config.behaviors.is_empty());
    }

    #[test]
    fn test_upsert_keeps_one_per_type() {
        let mut config = ScreensaverConfiguration::new();
        config.upsert_behavior(ConfigurationBehavior::new_default(ConfigurationBehaviorType::ScaleChange));
        config.upsert_behavior(ConfigurationBehavior::ScaleChange(PropertyBehavior::new(2.0, 3.0, 1.0)));
        config.upsert_behavior(ConfigurationBehavior::new_default(ConfigurationBehaviorType::AlphaChange));

        assert_eq!(config.behaviors.len(), 2);
        match config.behavior(ConfigurationBehaviorType::ScaleChange) {
            Some(ConfigurationBehavior::ScaleChange(b)) => assert_eq!(b.start, 2.0),
            other => panic!("unexpected {:?}", other),
        }

        let removed = config.remove_behavior(ConfigurationBehaviorType::AlphaChange);
        assert!(removed.is_some());
        assert!(config.remove_behavior(ConfigurationBehaviorType::AlphaChange).is_none());
    }

    #[test]
    fn test_enabled_behaviors_skip_disabled() {
        let mut config = ScreensaverConfiguration::new();
        let mut rotation = ConfigurationBehavior::new_default(ConfigurationBehaviorType::RotationChange);
        rotation.set_enabled(false);
        config.upsert_behavior(rotation);
        config.upsert_behavior(ConfigurationBehavior::new_default(ConfigurationBehaviorType::ColorChange));

        let enabled: Vec<_> = config.enabled_behaviors().map(|b| b.kind()).collect();
        assert_eq!(enabled, vec![ConfigurationBehaviorType::ColorChange]);
        // still retained for editing
        assert!(config.behavior(ConfigurationBehaviorType::RotationChange).is_some());
    }

    #[test]
    fn test_normalize() {
        let mut config = ScreensaverConfiguration {
            image_emit_rate: 1000.0,
            max_emit_count: 100_000,
            lifetime_seconds: 0.0,
            emit_location: EmitLocation::Custom { x: 99_999, y: 10 },
            background_mode: BackgroundMode::Image,
            behaviors: vec![
                ConfigurationBehavior::ScaleChange(PropertyBehavior::new(1.0, 2.0, 1.0)),
                ConfigurationBehavior::ScaleChange(PropertyBehavior::new(3.0, 4.0, 1.0)),
            ],
            ..Default::default()
        };
        config.normalize();

        assert_eq!(config.image_emit_rate, MAX_EMIT_RATE);
        assert_eq!(config.max_emit_count, MAX_EMIT_COUNT);
        assert_eq!(config.lifetime_seconds, MIN_LIFETIME);
        assert_eq!(
            config.emit_location,
            EmitLocation::Custom { x: MAX_EMIT_COORDINATE, y: 10 }
        );
        assert_eq!(config.background_mode, BackgroundMode::SolidColor);
        assert_eq!(config.behaviors.len(), 1);
        match &config.behaviors[0] {
            ConfigurationBehavior::ScaleChange(b) => assert_eq!(b.start, 3.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ScreensaverConfiguration =
            serde_json::from_str(r#"{"max_emit_count": 7, "emit_location": {"mode": "Custom", "x": 5, "y": 6}}"#)
                .unwrap();
        assert_eq!(config.max_emit_count, 7);
        assert_eq!(config.image_emit_rate, 1.0);
        assert_eq!(config.emit_location, EmitLocation::Custom { x: 5, y: 6 });
    }

    #[test]
    fn test_referenced_images_include_background() {
        let config = ScreensaverConfiguration {
            images: vec![ConfigurationImageItem::new("/a.png", "a.png")],
            background_image: Some(ConfigurationImageItem::new("/bg.png", "bg.png")),
            ..Default::default()
        };
        assert_eq!(config.referenced_images().count(), 2);
    }
}
