// src/effects/effects_manager.rs

use super::effect_from_behavior;
use crate::models::{ConfigurationBehavior, ConfigurationBehaviorType};
use crate::views::ItemStyle;

// the base trait which all item effects implement
pub trait ItemEffect {
    fn kind(&self) -> ConfigurationBehaviorType;
    fn apply(&self, style: &mut ItemStyle, time: f32);
    // switch to the end transition; returns its finish time if there is one
    fn begin_end_transition(&mut self, time: f32) -> Option<f32>;
}

/// The effects of one emitted item
#[derive(Default)]
pub struct ItemEffects {
    effects: Vec<Box<dyn ItemEffect>>,
}

impl ItemEffects {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Build runtime effects for the enabled behaviors, all starting at `spawn_time`
    pub fn from_behaviors<'a, I>(behaviors: I, spawn_time: f32) -> Self
    where
        I: IntoIterator<Item = &'a ConfigurationBehavior>,
    {
        let effects = behaviors
            .into_iter()
            .filter(|behavior| behavior.is_enabled())
            .map(|behavior| effect_from_behavior(behavior, spawn_time))
            .collect();
        Self { effects }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn has_effect(&self, kind: ConfigurationBehaviorType) -> bool {
        self.effects.iter().any(|effect| effect.kind() == kind)
    }

    /// Style at `time`, starting from the untouched item style
    pub fn style_at(&self, time: f32) -> ItemStyle {
        let mut style = ItemStyle::default();
        for effect in &self.effects {
            effect.apply(&mut style, time);
        }
        style
    }

    /// Start every end transition. Returns when the last one finishes, or
    /// `None` when no effect has an end transition.
    pub fn begin_end_transitions(&mut self, time: f32) -> Option<f32> {
        self.effects
            .iter_mut()
            .filter_map(|effect| effect.begin_end_transition(time))
            .fold(None, |latest: Option<f32>, finish| {
                Some(latest.map_or(finish, |latest| latest.max(finish)))
            })
    }
}
