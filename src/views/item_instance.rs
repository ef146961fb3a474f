// src/views/item_instance.rs
//
// One emitted image on screen and its lifecycle.

use super::Transform2D;
use crate::effects::ItemEffects;
use crate::models::{Color, ConfigurationBehavior};
use nannou::prelude::*;

/// Per-frame appearance of an item. Rotation is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub tint: Color,
    pub alpha: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            alpha: 1.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemPhase {
    Alive,
    Retiring { until: f32 },
    Dead,
}

pub struct ImageItemInstance {
    id: u64,
    image_index: usize,
    position: Vec2,
    // None for infinite lifetime
    expires_at: Option<f32>,
    phase: ItemPhase,
    effects: ItemEffects,
    style: ItemStyle,
    transform: Transform2D,
}

impl ImageItemInstance {
    pub fn new(
        id: u64,
        image_index: usize,
        position: Vec2,
        spawn_time: f32,
        lifetime: Option<f32>,
        behaviors: &[ConfigurationBehavior],
    ) -> Self {
        let effects = ItemEffects::from_behaviors(behaviors, spawn_time);
        let style = effects.style_at(spawn_time);
        Self {
            id,
            image_index,
            position,
            expires_at: lifetime.map(|lifetime| spawn_time + lifetime),
            phase: ItemPhase::Alive,
            effects,
            transform: Transform2D::from_style(position, &style),
            style,
        }
    }

    pub fn update(&mut self, time: f32) {
        match self.phase {
            ItemPhase::Alive => {
                if self.expires_at.is_some_and(|expires_at| time >= expires_at) {
                    self.phase = ItemPhase::Dead;
                }
            }
            ItemPhase::Retiring { until } => {
                if time >= until {
                    self.phase = ItemPhase::Dead;
                }
            }
            ItemPhase::Dead => {}
        }

        if self.phase != ItemPhase::Dead {
            self.style = self.effects.style_at(time);
            self.transform = Transform2D::from_style(self.position, &self.style);
        }
    }

    /// Start the end transitions. Items without any die right away.
    pub fn retire(&mut self, time: f32) {
        if self.phase != ItemPhase::Alive {
            return;
        }
        self.phase = match self.effects.begin_end_transitions(time) {
            Some(until) => ItemPhase::Retiring { until },
            None => ItemPhase::Dead,
        };
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase == ItemPhase::Alive
    }

    pub fn is_dead(&self) -> bool {
        self.phase == ItemPhase::Dead
    }

    pub fn style(&self) -> &ItemStyle {
        &self.style
    }

    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }
}
