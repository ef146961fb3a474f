// src/views/background.rs
//
// Background state: the desktop (transparent window), a solid color faded in
// from black, or a laid-out image.

use crate::animation::{EasingType, Tween};
use crate::models::{BackgroundMode, BackgroundScaleMode, Color, ScreensaverConfiguration};
use crate::utilities::background_layout;
use nannou::prelude::*;
use nannou::wgpu;

pub struct BackgroundManager {
    mode: BackgroundMode,
    color_fader: Tween<Color>,
    scale_mode: BackgroundScaleMode,
    texture: Option<wgpu::Texture>,
}

impl BackgroundManager {
    /// `texture` is the loaded background image, if any. Image mode without a
    /// texture falls back to the solid color.
    pub fn new(
        config: &ScreensaverConfiguration,
        texture: Option<wgpu::Texture>,
        fade_in: f32,
        start_time: f32,
    ) -> Self {
        let mode = Self::resolve_mode(config, texture.is_some());
        Self {
            mode,
            color_fader: Tween::new(
                Color::BLACK,
                config.background_color,
                start_time,
                fade_in.max(0.0),
                EasingType::EaseIn,
            ),
            scale_mode: config.background_scale_mode,
            texture,
        }
    }

    /// Mode actually shown: image mode without an image shows the color
    pub fn resolve_mode(config: &ScreensaverConfiguration, has_image: bool) -> BackgroundMode {
        match config.background_mode {
            BackgroundMode::Image if !has_image => BackgroundMode::SolidColor,
            mode => mode,
        }
    }

    /// Whether the window needs a transparent surface to show the desktop.
    /// Decided before the window exists, so before any texture is uploaded.
    pub fn needs_transparent_window(config: &ScreensaverConfiguration, has_image: bool) -> bool {
        Self::resolve_mode(config, has_image) == BackgroundMode::Desktop
    }

    pub fn mode(&self) -> BackgroundMode {
        self.mode
    }

    pub fn clear_color(&self, current_time: f32) -> Rgba {
        match self.mode {
            BackgroundMode::Desktop => rgba(0.0, 0.0, 0.0, 0.0),
            BackgroundMode::SolidColor => self.color_fader.value_at(current_time).to_rgba(),
            BackgroundMode::Image => Color::BLACK.to_rgba(),
        }
    }

    pub fn draw(&self, draw: &Draw, window_rect: Rect, current_time: f32) {
        draw.background().color(self.clear_color(current_time));

        if self.mode != BackgroundMode::Image {
            return;
        }
        if let Some(texture) = &self.texture {
            let [w, h] = texture.size();
            let rects = background_layout(
                self.scale_mode,
                vec2(w as f32, h as f32),
                window_rect.wh(),
            );
            for rect in rects {
                draw.texture(texture).xy(rect.xy()).wh(rect.wh());
            }
        }
    }
}
