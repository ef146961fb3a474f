// src/render/texture_library.rs
//
// Decoded item images and their GPU textures, indexed in configuration order.

use crate::utilities::fit_within;
use nannou::image::{self, imageops::FilterType, DynamicImage, GenericImageView, RgbaImage};
use nannou::prelude::*;
use nannou::wgpu;
use std::path::Path;
use tracing::{info, warn};

pub struct LoadedImage {
    pub source: RgbaImage,
    pub texture: wgpu::Texture,
}

impl LoadedImage {
    pub fn size(&self) -> Vec2 {
        vec2(self.source.width() as f32, self.source.height() as f32)
    }
}

#[derive(Default)]
pub struct TextureLibrary {
    images: Vec<LoadedImage>,
}

impl TextureLibrary {
    /// Load every readable image. Unreadable files are skipped with a warning.
    pub fn load<'a, I>(app: &App, paths: I, max_extent: u32) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut images = Vec::new();
        for path in paths {
            match load_image(path, max_extent) {
                Ok(source) => {
                    let texture =
                        wgpu::Texture::from_image(app, &DynamicImage::ImageRgba8(source.clone()));
                    images.push(LoadedImage { source, texture });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable image");
                }
            }
        }
        info!(count = images.len(), "Loaded item images");
        Self { images }
    }

    pub fn get(&self, index: usize) -> Option<&LoadedImage> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Decode an image, downscaled so its longest side is at most `max_extent`
pub fn load_image(path: &Path, max_extent: u32) -> image::ImageResult<RgbaImage> {
    let decoded = image::open(path)?;
    let size = vec2(decoded.width() as f32, decoded.height() as f32);
    let fitted = fit_within(size, max_extent.max(1) as f32);
    if fitted == size {
        return Ok(decoded.into_rgba8());
    }

    let width = (fitted.x.round() as u32).max(1);
    let height = (fitted.y.round() as u32).max(1);
    Ok(decoded
        .resize_exact(width, height, FilterType::Triangle)
        .into_rgba8())
}
