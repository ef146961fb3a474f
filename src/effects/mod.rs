pub mod behavior_effects;
pub mod effects_manager;

pub use behavior_effects::{effect_from_behavior, PropertyEffect};
pub use effects_manager::*;
