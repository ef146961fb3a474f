// src/utilities/layout.rs
//
// Screen geometry helpers. nannou places the origin at the window center with
// y pointing up; settings use top-left pixel coordinates.

use crate::models::BackgroundScaleMode;
use nannou::prelude::*;

/// Where the background image is drawn, one rect per copy of the image.
/// Degenerate sizes produce no rects.
pub fn background_layout(mode: BackgroundScaleMode, image_size: Vec2, screen_size: Vec2) -> Vec<Rect> {
    if image_size.x <= 0.0 || image_size.y <= 0.0 || screen_size.x <= 0.0 || screen_size.y <= 0.0 {
        return Vec::new();
    }

    match mode {
        BackgroundScaleMode::Stretch => vec![Rect::from_w_h(screen_size.x, screen_size.y)],
        BackgroundScaleMode::Center => vec![Rect::from_w_h(image_size.x, image_size.y)],
        BackgroundScaleMode::Fit => {
            let scale = (screen_size.x / image_size.x).min(screen_size.y / image_size.y);
            vec![Rect::from_w_h(image_size.x * scale, image_size.y * scale)]
        }
        BackgroundScaleMode::Fill => {
            let scale = (screen_size.x / image_size.x).max(screen_size.y / image_size.y);
            vec![Rect::from_w_h(image_size.x * scale, image_size.y * scale)]
        }
        BackgroundScaleMode::Tile => {
            // tiles start at the top-left corner
            let cols = (screen_size.x / image_size.x).ceil() as usize;
            let rows = (screen_size.y / image_size.y).ceil() as usize;
            let left = -screen_size.x / 2.0;
            let top = screen_size.y / 2.0;

            let mut rects = Vec::with_capacity(cols * rows);
            for row in 0..rows {
                for col in 0..cols {
                    let x = left + image_size.x * (col as f32 + 0.5);
                    let y = top - image_size.y * (row as f32 + 0.5);
                    rects.push(Rect::from_x_y_w_h(x, y, image_size.x, image_size.y));
                }
            }
            rects
        }
    }
}

/// Convert a top-left pixel coordinate to a centered point, clamped to the screen
pub fn top_left_to_centered(x: f32, y: f32, screen_size: Vec2) -> Vec2 {
    let half = screen_size / 2.0;
    let point = vec2(x - half.x, half.y - y);
    point.clamp(-half, half)
}

/// Longest-side fit: the size an image takes when its longest side is limited to `max_extent`
pub fn fit_within(size: Vec2, max_extent: f32) -> Vec2 {
    let longest = size.x.max(size.y);
    if longest <= max_extent || longest <= 0.0 {
        return size;
    }
    size * (max_extent / longest)
}
