// src/render/tint.rs
//
// CPU tinting of item images. Texture draws carry no per-vertex color, so the
// tint and alpha of an item are baked into a texture of their own. Tints are
// quantized to keep the number of distinct textures bounded.

use crate::models::Color;
use nannou::image::RgbaImage;
use rayon::prelude::*;

/// Multiply RGB by `tint` and alpha by `tint.a * alpha`
pub fn tint_image(image: &RgbaImage, tint: Color, alpha: f32) -> RgbaImage {
    let mut tinted = image.clone();
    let row_len = tinted.width() as usize * 4;
    if row_len == 0 {
        return tinted;
    }

    let factors = [
        tint.r as f32 / 255.0,
        tint.g as f32 / 255.0,
        tint.b as f32 / 255.0,
        tint.a as f32 / 255.0 * alpha.clamp(0.0, 1.0),
    ];

    let pixels: &mut [u8] = &mut tinted;
    pixels.par_chunks_mut(row_len).for_each(|row| {
        for pixel in row.chunks_exact_mut(4) {
            for (channel, factor) in pixel.iter_mut().zip(factors) {
                *channel = (*channel as f32 * factor).round() as u8;
            }
        }
    });
    tinted
}

/// Cache key for a tinted copy of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TintKey {
    pub image_index: usize,
    levels: u8,
    // quantized steps, 0..levels
    tint: [u8; 4],
    alpha: u8,
}

impl TintKey {
    pub fn new(image_index: usize, tint: Color, alpha: f32, levels: u8) -> Self {
        let levels = levels.max(2);
        let max_step = (levels - 1) as f32;
        let step = |value: f32| (value.clamp(0.0, 1.0) * max_step).round() as u8;
        let channel = |c: u8| step(c as f32 / 255.0);
        Self {
            image_index,
            levels,
            tint: [channel(tint.r), channel(tint.g), channel(tint.b), channel(tint.a)],
            alpha: step(alpha),
        }
    }

    fn max_step(&self) -> u8 {
        self.levels - 1
    }

    pub fn tint(&self) -> Color {
        let max_step = self.max_step() as f32;
        let channel = |s: u8| (s as f32 / max_step * 255.0).round() as u8;
        Color::rgba(
            channel(self.tint[0]),
            channel(self.tint[1]),
            channel(self.tint[2]),
            channel(self.tint[3]),
        )
    }

    pub fn alpha(&self) -> f32 {
        self.alpha as f32 / self.max_step() as f32
    }

    /// White and opaque: the untinted texture can be drawn as is
    pub fn is_identity(&self) -> bool {
        let max_step = self.max_step();
        self.alpha == max_step && self.tint.iter().all(|&s| s == max_step)
    }

    pub fn is_invisible(&self) -> bool {
        self.alpha == 0 || self.tint[3] == 0
    }
}
