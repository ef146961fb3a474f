// src/editor/behavior_editor.rs
//
// Field-level editing of a single behavior. `BehaviorEditor::for_type` is the
// editor factory: one editor shape per behavior type, prefilled from the
// behavior already in the configuration or from the behavior factory.

use std::fmt;

use super::{EditorError, Result};
use crate::animation::EasingType;
use crate::models::behavior::{clamp_alpha, clamp_duration, clamp_rotation, clamp_scale};
use crate::models::{
    Color, ConfigurationBehavior, ConfigurationBehaviorType, EndTransition, PropertyBehavior,
};

/// A value typed into one of the behavior's fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BehaviorValue {
    Color(Color),
    Number(f32),
}

impl BehaviorValue {
    /// Parse user input according to what the behavior type expects
    pub fn parse(kind: ConfigurationBehaviorType, input: &str) -> Result<Self> {
        match kind {
            ConfigurationBehaviorType::ColorChange => input
                .parse::<Color>()
                .map(BehaviorValue::Color)
                .map_err(|e| EditorError::InvalidValue(e.to_string())),
            _ => {
                let number: f32 = input
                    .trim()
                    .parse()
                    .map_err(|_| EditorError::InvalidValue(format!("'{}' is not a number", input)))?;
                if !number.is_finite() {
                    return Err(EditorError::InvalidValue(format!("'{}' is not finite", input)));
                }
                Ok(BehaviorValue::Number(number))
            }
        }
    }
}

impl fmt::Display for BehaviorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorValue::Color(c) => write!(f, "{}", c),
            BehaviorValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Start,
    End,
    EndDestination,
}

impl Field {
    fn assign<T>(self, behavior: &mut PropertyBehavior<T>, value: T) {
        match self {
            Field::Start => behavior.start = value,
            Field::End => behavior.end = value,
            Field::EndDestination => match behavior.end_transition.as_mut() {
                Some(end) => end.destination = value,
                None => {
                    behavior.end_transition = Some(EndTransition {
                        destination: value,
                        duration: 0.0,
                    })
                }
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct BehaviorEditor {
    behavior: ConfigurationBehavior,
}

impl BehaviorEditor {
    pub fn for_type(
        kind: ConfigurationBehaviorType,
        existing: Option<&ConfigurationBehavior>,
    ) -> Self {
        let behavior = existing
            .filter(|b| b.kind() == kind)
            .cloned()
            .unwrap_or_else(|| ConfigurationBehavior::new_default(kind));
        Self { behavior }
    }

    pub fn kind(&self) -> ConfigurationBehaviorType {
        self.behavior.kind()
    }

    pub fn behavior(&self) -> &ConfigurationBehavior {
        &self.behavior
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.behavior.set_enabled(enabled);
    }

    pub fn set_start(&mut self, value: BehaviorValue) -> Result<()> {
        self.set_field(Field::Start, value)
    }

    pub fn set_end(&mut self, value: BehaviorValue) -> Result<()> {
        self.set_field(Field::End, value)
    }

    pub fn set_duration(&mut self, seconds: f32) {
        let seconds = clamp_duration(seconds);
        match &mut self.behavior {
            ConfigurationBehavior::ColorChange(b) => b.duration = seconds,
            ConfigurationBehavior::AlphaChange(b) => b.duration = seconds,
            ConfigurationBehavior::ScaleChange(b) => b.duration = seconds,
            ConfigurationBehavior::RotationChange(b) => b.duration = seconds,
        }
    }

    pub fn set_easing(&mut self, easing: EasingType) {
        match &mut self.behavior {
            ConfigurationBehavior::ColorChange(b) => b.easing = easing,
            ConfigurationBehavior::AlphaChange(b) => b.easing = easing,
            ConfigurationBehavior::ScaleChange(b) => b.easing = easing,
            ConfigurationBehavior::RotationChange(b) => b.easing = easing,
        }
    }

    /// Set or clear the end transition (destination, duration in seconds)
    pub fn set_end_transition(&mut self, transition: Option<(BehaviorValue, f32)>) -> Result<()> {
        let Some((destination, seconds)) = transition else {
            match &mut self.behavior {
                ConfigurationBehavior::ColorChange(b) => b.end_transition = None,
                ConfigurationBehavior::AlphaChange(b) => b.end_transition = None,
                ConfigurationBehavior::ScaleChange(b) => b.end_transition = None,
                ConfigurationBehavior::RotationChange(b) => b.end_transition = None,
            }
            return Ok(());
        };

        self.set_field(Field::EndDestination, destination)?;
        let seconds = clamp_duration(seconds);
        let end_duration = match &mut self.behavior {
            ConfigurationBehavior::ColorChange(b) => b.end_transition.as_mut().map(|e| &mut e.duration),
            ConfigurationBehavior::AlphaChange(b) => b.end_transition.as_mut().map(|e| &mut e.duration),
            ConfigurationBehavior::ScaleChange(b) => b.end_transition.as_mut().map(|e| &mut e.duration),
            ConfigurationBehavior::RotationChange(b) => b.end_transition.as_mut().map(|e| &mut e.duration),
        };
        if let Some(duration) = end_duration {
            *duration = seconds;
        }
        Ok(())
    }

    pub fn finish(self) -> ConfigurationBehavior {
        self.behavior
    }

    fn set_field(&mut self, field: Field, value: BehaviorValue) -> Result<()> {
        let kind = self.kind();
        match (&mut self.behavior, value) {
            (ConfigurationBehavior::ColorChange(b), BehaviorValue::Color(c)) => field.assign(b, c),
            (ConfigurationBehavior::AlphaChange(b), BehaviorValue::Number(n)) => {
                field.assign(b, clamp_alpha(n))
            }
            (ConfigurationBehavior::ScaleChange(b), BehaviorValue::Number(n)) => {
                field.assign(b, clamp_scale(n))
            }
            (ConfigurationBehavior::RotationChange(b), BehaviorValue::Number(n)) => {
                field.assign(b, clamp_rotation(n))
            }
            (_, value) => return Err(EditorError::ValueKind { behavior: kind, value }),
        }
        Ok(())
    }
}
