pub mod config_store;
pub mod error;
pub mod image_cache;
pub mod store_lock;

pub use config_store::{ConfigurationStore, StoreGuard, StoreOptions};
pub use error::{Result, StoreError};
pub use image_cache::{StagedImage, TempImageCache};
pub use store_lock::StoreLock;
