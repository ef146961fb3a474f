// src/animation/tween.rs
//
// Time-based interpolation between two values. Times are app seconds, the
// same clock the update loop passes around.

use super::EasingType;
use crate::models::Color;

pub trait Interpolate: Copy {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T: Interpolate> {
    pub start: T,
    pub end: T,
    pub start_time: f32,
    pub duration: f32,
    pub easing: EasingType,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(start: T, end: T, start_time: f32, duration: f32, easing: EasingType) -> Self {
        Self {
            start,
            end,
            start_time,
            duration,
            easing,
        }
    }

    /// Linear progress in 0.0..=1.0
    pub fn progress(&self, time: f32) -> f32 {
        // zero-length tweens jump straight to the end
        if self.duration.abs() < 0.001 {
            return 1.0;
        }
        ((time - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, time: f32) -> T {
        let t = self.easing.apply(self.progress(time));
        self.start.lerp(&self.end, t)
    }

    pub fn is_finished(&self, time: f32) -> bool {
        self.progress(time) >= 1.0
    }

    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration.max(0.0)
    }
}
