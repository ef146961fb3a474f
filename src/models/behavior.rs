// src/models/behavior.rs
//
// Per-type behavior configurations. A behavior interpolates one visual
// property of an emitted image item from `start` to `end` over `duration`
// seconds, with an optional end transition played while the item retires.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Color;
use crate::animation::EasingType;
use crate::constants::validation::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigurationBehaviorType {
    ColorChange,
    AlphaChange,
    ScaleChange,
    RotationChange,
}

impl ConfigurationBehaviorType {
    pub const ALL: [ConfigurationBehaviorType; 4] = [
        ConfigurationBehaviorType::ColorChange,
        ConfigurationBehaviorType::AlphaChange,
        ConfigurationBehaviorType::ScaleChange,
        ConfigurationBehaviorType::RotationChange,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ConfigurationBehaviorType::ColorChange => "Color Change",
            ConfigurationBehaviorType::AlphaChange => "Alpha Change",
            ConfigurationBehaviorType::ScaleChange => "Scale Change",
            ConfigurationBehaviorType::RotationChange => "Rotation Change",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfigurationBehaviorType::ColorChange => "Tints the image from one color to another",
            ConfigurationBehaviorType::AlphaChange => "Fades the image between two opacities",
            ConfigurationBehaviorType::ScaleChange => "Grows or shrinks the image",
            ConfigurationBehaviorType::RotationChange => "Spins the image between two angles",
        }
    }

    /// Short name used on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            ConfigurationBehaviorType::ColorChange => "color",
            ConfigurationBehaviorType::AlphaChange => "alpha",
            ConfigurationBehaviorType::ScaleChange => "scale",
            ConfigurationBehaviorType::RotationChange => "rotation",
        }
    }
}

impl fmt::Display for ConfigurationBehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ConfigurationBehaviorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        ConfigurationBehaviorType::ALL
            .into_iter()
            .find(|kind| kind.cli_name() == lowered)
            .ok_or_else(|| {
                format!(
                    "unknown behavior '{}', expected one of color, alpha, scale, rotation",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndTransition<T> {
    pub destination: T,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBehavior<T> {
    pub enabled: bool,
    pub start: T,
    pub end: T,
    pub duration: f32,
    #[serde(default)]
    pub easing: EasingType,
    #[serde(default)]
    pub end_transition: Option<EndTransition<T>>,
}

impl<T> PropertyBehavior<T> {
    pub fn new(start: T, end: T, duration: f32) -> Self {
        Self {
            enabled: true,
            start,
            end,
            duration,
            easing: EasingType::Linear,
            end_transition: None,
        }
    }

    pub fn with_end_transition(mut self, destination: T, duration: f32) -> Self {
        self.end_transition = Some(EndTransition {
            destination,
            duration,
        });
        self
    }

    fn clamp_durations(&mut self) {
        self.duration = clamp_duration(self.duration);
        if let Some(end) = self.end_transition.as_mut() {
            end.duration = clamp_duration(end.duration);
        }
    }

    fn map_values(&mut self, f: impl Fn(&T) -> T) {
        self.start = f(&self.start);
        self.end = f(&self.end);
        if let Some(end) = self.end_transition.as_mut() {
            end.destination = f(&end.destination);
        }
    }
}

pub fn clamp_duration(duration: f32) -> f32 {
    if duration.is_finite() {
        duration.clamp(0.0, MAX_BEHAVIOR_DURATION)
    } else {
        0.0
    }
}

pub fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

pub fn clamp_rotation(degrees: f32) -> f32 {
    if degrees.is_finite() {
        degrees.clamp(-MAX_ROTATION, MAX_ROTATION)
    } else {
        0.0
    }
}

pub type ColorChangeBehavior = PropertyBehavior<Color>;
pub type AlphaChangeBehavior = PropertyBehavior<f32>;
pub type ScaleChangeBehavior = PropertyBehavior<f32>;
pub type RotationChangeBehavior = PropertyBehavior<f32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigurationBehavior {
    ColorChange(ColorChangeBehavior),
    AlphaChange(AlphaChangeBehavior),
    ScaleChange(ScaleChangeBehavior),
    RotationChange(RotationChangeBehavior),
}

impl ConfigurationBehavior {
    /// Behavior factory: the parameters a freshly added behavior starts with
    pub fn new_default(kind: ConfigurationBehaviorType) -> Self {
        match kind {
            ConfigurationBehaviorType::ColorChange => ConfigurationBehavior::ColorChange(
                PropertyBehavior::new(Color::WHITE, Color::rgb(64, 160, 255), 5.0),
            ),
            ConfigurationBehaviorType::AlphaChange => ConfigurationBehavior::AlphaChange(
                PropertyBehavior::new(0.0, 1.0, 2.0).with_end_transition(0.0, 2.0),
            ),
            ConfigurationBehaviorType::ScaleChange => {
                ConfigurationBehavior::ScaleChange(PropertyBehavior::new(0.5, 1.0, 3.0))
            }
            ConfigurationBehaviorType::RotationChange => {
                ConfigurationBehavior::RotationChange(PropertyBehavior::new(0.0, 360.0, 10.0))
            }
        }
    }

    pub fn kind(&self) -> ConfigurationBehaviorType {
        match self {
            ConfigurationBehavior::ColorChange(_) => ConfigurationBehaviorType::ColorChange,
            ConfigurationBehavior::AlphaChange(_) => ConfigurationBehaviorType::AlphaChange,
            ConfigurationBehavior::ScaleChange(_) => ConfigurationBehaviorType::ScaleChange,
            ConfigurationBehavior::RotationChange(_) => ConfigurationBehaviorType::RotationChange,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            ConfigurationBehavior::ColorChange(b) => b.enabled,
            ConfigurationBehavior::AlphaChange(b) => b.enabled,
            ConfigurationBehavior::ScaleChange(b) => b.enabled,
            ConfigurationBehavior::RotationChange(b) => b.enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            ConfigurationBehavior::ColorChange(b) => b.enabled = enabled,
            ConfigurationBehavior::AlphaChange(b) => b.enabled = enabled,
            ConfigurationBehavior::ScaleChange(b) => b.enabled = enabled,
            ConfigurationBehavior::RotationChange(b) => b.enabled = enabled,
        }
    }

    pub fn has_end_transition(&self) -> bool {
        match self {
            ConfigurationBehavior::ColorChange(b) => b.end_transition.is_some(),
            ConfigurationBehavior::AlphaChange(b) => b.end_transition.is_some(),
            ConfigurationBehavior::ScaleChange(b) => b.end_transition.is_some(),
            ConfigurationBehavior::RotationChange(b) => b.end_transition.is_some(),
        }
    }

    /// Pull every value and duration back into its valid range
    pub fn clamp_values(&mut self) {
        match self {
            ConfigurationBehavior::ColorChange(b) => b.clamp_durations(),
            ConfigurationBehavior::AlphaChange(b) => {
                b.clamp_durations();
                b.map_values(|v| clamp_alpha(*v));
            }
            ConfigurationBehavior::ScaleChange(b) => {
                b.clamp_durations();
                b.map_values(|v| clamp_scale(*v));
            }
            ConfigurationBehavior::RotationChange(b) => {
                b.clamp_durations();
                b.map_values(|v| clamp_rotation(*v));
            }
        }
    }

    /// One-line summary for listings
    pub fn summary(&self) -> String {
        fn describe<T: fmt::Display>(b: &PropertyBehavior<T>) -> String {
            let mut line = format!(
                "{} -> {} over {:.2}s ({:?})",
                b.start, b.end, b.duration, b.easing
            );
            if let Some(end) = &b.end_transition {
                line.push_str(&format!(
                    ", on retire -> {} over {:.2}s",
                    end.destination, end.duration
                ));
            }
            line
        }

        let state = if self.is_enabled() { "on " } else { "off" };
        let body = match self {
            ConfigurationBehavior::ColorChange(b) => describe(b),
            ConfigurationBehavior::AlphaChange(b) => describe(b),
            ConfigurationBehavior::ScaleChange(b) => describe(b),
            ConfigurationBehavior::RotationChange(b) => describe(b),
        };
        format!("[{}] {:<16} {}", state, self.kind().display_name(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_matches_kind() {
        for kind in ConfigurationBehaviorType::ALL {
            let behavior = ConfigurationBehavior::new_default(kind);
            assert_eq!(behavior.kind(), kind);
            assert!(behavior.is_enabled());
        }
    }

    #[test]
    fn test_parse_behavior_type() {
        assert_eq!(
            "Scale".parse::<ConfigurationBehaviorType>(),
            Ok(ConfigurationBehaviorType::ScaleChange)
        );
        assert!("wobble".parse::<ConfigurationBehaviorType>().is_err());
    }

    #[test]
    fn test_disabled_keeps_parameters() {
        let mut behavior = ConfigurationBehavior::new_default(ConfigurationBehaviorType::AlphaChange);
        let before = behavior.clone();
        behavior.set_enabled(false);
        assert!(!behavior.is_enabled());

        behavior.set_enabled(true);
        assert_eq!(behavior, before);
    }

    #[test]
    fn test_clamp_values() {
        let mut behavior = ConfigurationBehavior::AlphaChange(
            PropertyBehavior::new(-0.5, 4.0, -2.0).with_end_transition(2.0, f32::NAN),
        );
        behavior.clamp_values();

        match behavior {
            ConfigurationBehavior::AlphaChange(b) => {
                assert_eq!(b.start, 0.0);
                assert_eq!(b.end, 1.0);
                assert_eq!(b.duration, 0.0);
                let end = b.end_transition.unwrap();
                assert_eq!(end.destination, 1.0);
                assert_eq!(end.duration, 0.0);
            }
            other => panic!("unexpected variant {:?}", other),
        }

        let mut scale = ConfigurationBehavior::ScaleChange(PropertyBehavior::new(0.0, 100.0, 1.0));
        scale.clamp_values();
        if let ConfigurationBehavior::ScaleChange(b) = scale {
            assert_eq!(b.start, MIN_SCALE);
            assert_eq!(b.end, MAX_SCALE);
        }
    }

    #[test]
    fn test_serde_tagged_layout() {
        let behavior = ConfigurationBehavior::ColorChange(PropertyBehavior::new(
            Color::WHITE,
            Color::rgb(255, 0, 0),
            1.5,
        ));
        let json = serde_json::to_value(&behavior).unwrap();
        assert_eq!(json["type"], "ColorChange");
        assert_eq!(json["end"], "#FF0000");
        assert_eq!(json["easing"], "linear");

        // easing and end_transition may be missing in older files
        let parsed: ConfigurationBehavior = serde_json::from_str(
            r#"{"type":"RotationChange","enabled":false,"start":0.0,"end":90.0,"duration":2.0}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind(), ConfigurationBehaviorType::RotationChange);
        assert!(!parsed.is_enabled());
        assert!(!parsed.has_end_transition());
    }
}
