pub mod config_load;
pub mod config_types;

pub use config_load::{Config, ConfigError, CONFIG_FILENAME};
pub use config_types::{
    AnimationConfig, InputConfig, PathConfig, RenderingConfig, StoreConfig, WindowConfig,
};
