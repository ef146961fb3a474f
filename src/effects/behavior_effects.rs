// src/effects/behavior_effects.rs
//
// Runtime side of the configured behaviors. Each enabled behavior becomes one
// effect on each emitted item; the effect writes its property into the item's
// style every frame.

use super::ItemEffect;
use crate::animation::{EasingType, Interpolate, Tween};
use crate::models::{ConfigurationBehavior, ConfigurationBehaviorType, EndTransition, PropertyBehavior};
use crate::views::ItemStyle;

pub struct PropertyEffect<T: Interpolate> {
    kind: ConfigurationBehaviorType,
    tween: Tween<T>,
    end_transition: Option<EndTransition<T>>,
    // set once the item starts retiring
    ending: Option<Tween<T>>,
    write: fn(&mut ItemStyle, T),
}

impl<T: Interpolate> PropertyEffect<T> {
    pub fn new(
        kind: ConfigurationBehaviorType,
        behavior: &PropertyBehavior<T>,
        spawn_time: f32,
        write: fn(&mut ItemStyle, T),
    ) -> Self {
        Self {
            kind,
            tween: Tween::new(
                behavior.start,
                behavior.end,
                spawn_time,
                behavior.duration,
                behavior.easing,
            ),
            end_transition: behavior.end_transition.clone(),
            ending: None,
            write,
        }
    }

    fn current_value(&self, time: f32) -> T {
        match &self.ending {
            Some(ending) => ending.value_at(time),
            None => self.tween.value_at(time),
        }
    }
}

impl<T: Interpolate> ItemEffect for PropertyEffect<T> {
    fn kind(&self) -> ConfigurationBehaviorType {
        self.kind
    }

    fn apply(&self, style: &mut ItemStyle, time: f32) {
        (self.write)(style, self.current_value(time));
    }

    fn begin_end_transition(&mut self, time: f32) -> Option<f32> {
        if let Some(ending) = &self.ending {
            return Some(ending.end_time());
        }

        let current = self.tween.value_at(time);
        let ending = match &self.end_transition {
            Some(end) => Tween::new(
                current,
                end.destination,
                time,
                end.duration,
                self.tween.easing,
            ),
            // no end transition: hold the value reached so far
            None => Tween::new(current, current, time, 0.0, EasingType::Linear),
        };
        let finish = ending.end_time();
        self.ending = Some(ending);
        self.end_transition.as_ref().map(|_| finish)
    }
}

/// Effect factory: one runtime effect per configured behavior
pub fn effect_from_behavior(behavior: &ConfigurationBehavior, spawn_time: f32) -> Box<dyn ItemEffect> {
    let kind = behavior.kind();
    match behavior {
        ConfigurationBehavior::ColorChange(b) => Box::new(PropertyEffect::new(
            kind,
            b,
            spawn_time,
            |style, tint| style.tint = tint,
        )),
        ConfigurationBehavior::AlphaChange(b) => Box::new(PropertyEffect::new(
            kind,
            b,
            spawn_time,
            |style, alpha| style.alpha = alpha,
        )),
        ConfigurationBehavior::ScaleChange(b) => Box::new(PropertyEffect::new(
            kind,
            b,
            spawn_time,
            |style, scale| style.scale = scale,
        )),
        ConfigurationBehavior::RotationChange(b) => Box::new(PropertyEffect::new(
            kind,
            b,
            spawn_time,
            |style, rotation| style.rotation = rotation,
        )),
    }
}
