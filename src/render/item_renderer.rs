// src/render/item_renderer.rs
// draws the scene's items: tinted textures placed by each item's transform

use nannou::image::DynamicImage;
use nannou::prelude::*;
use nannou::wgpu;

use super::{tint_image, TextureLibrary, TintCache, TintKey};
use crate::views::ScreensaverScene;

pub struct ItemRenderer {
    cache: TintCache<wgpu::Texture>,
    tint_levels: u8,
}

impl ItemRenderer {
    pub fn new(tint_levels: u8, cache_size: usize) -> Self {
        Self {
            cache: TintCache::new(cache_size),
            tint_levels,
        }
    }

    pub fn cached_textures(&self) -> usize {
        self.cache.len()
    }

    /// Create the tinted textures this frame needs. Runs in update, where the
    /// cache can be mutated.
    pub fn prepare(&mut self, app: &App, scene: &ScreensaverScene, library: &TextureLibrary) {
        for item in scene.items() {
            let style = item.style();
            let key = TintKey::new(item.image_index(), style.tint, style.alpha, self.tint_levels);
            if key.is_identity() || key.is_invisible() {
                continue;
            }
            let Some(image) = library.get(item.image_index()) else {
                continue;
            };
            self.cache.get_or_insert_with(key, || {
                let tinted = tint_image(&image.source, key.tint(), key.alpha());
                wgpu::Texture::from_image(app, &DynamicImage::ImageRgba8(tinted))
            });
        }
    }

    /// Draws all visible items, oldest first so newer items land on top
    pub fn draw(&self, draw: &Draw, window_rect: Rect, scene: &ScreensaverScene, library: &TextureLibrary) {
        for item in scene.items() {
            let Some(image) = library.get(item.image_index()) else {
                continue;
            };

            let style = item.style();
            let key = TintKey::new(item.image_index(), style.tint, style.alpha, self.tint_levels);
            if key.is_invisible() {
                continue;
            }

            let transform = item.transform();
            let size = image.size() * transform.scale;
            if size.x <= 0.0 || size.y <= 0.0 {
                continue;
            }
            if window_rect.overlap(transform.bounding_rect(image.size())).is_none() {
                continue;
            }

            // an evicted tint falls back to the plain texture for a frame
            let texture = if key.is_identity() {
                &image.texture
            } else {
                self.cache.get(&key).unwrap_or(&image.texture)
            };

            draw.texture(texture)
                .xy(transform.translation)
                .wh(size)
                .rotate(transform.rotation_radians());
        }
    }
}
