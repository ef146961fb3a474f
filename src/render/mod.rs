// src/render/mod.rs
// Item image loading, CPU tinting and texture drawing

pub mod item_renderer;
pub mod texture_library;
pub mod tint;
pub mod tint_cache;

pub use item_renderer::ItemRenderer;
pub use texture_library::{load_image, LoadedImage, TextureLibrary};
pub use tint::{tint_image, TintKey};
pub use tint_cache::TintCache;
