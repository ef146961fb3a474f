// src/views/mod.rs

pub mod background;
pub mod item_instance;
pub mod scene;
pub mod transform;

pub use background::BackgroundManager;
pub use item_instance::{ImageItemInstance, ItemPhase, ItemStyle};
pub use scene::{Bounds, ScreensaverScene};
pub use transform::Transform2D;
