pub mod behavior;
pub mod color;
pub mod configuration;
pub mod image_item;

pub use behavior::{
    ConfigurationBehavior, ConfigurationBehaviorType, EndTransition, PropertyBehavior,
};
pub use color::Color;
pub use configuration::{BackgroundMode, BackgroundScaleMode, EmitLocation, ScreensaverConfiguration};
pub use image_item::ConfigurationImageItem;
