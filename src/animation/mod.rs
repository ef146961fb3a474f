pub mod easing;
pub mod emitter;
pub mod tween;

pub use easing::EasingType;
pub use emitter::EmitScheduler;
pub use tween::{Interpolate, Tween};
