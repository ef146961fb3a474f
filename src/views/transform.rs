use super::ItemStyle;
use nannou::prelude::*;

/// Placement of a drawn item. Rotation is in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform2D {
    pub translation: Vec2,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    pub fn from_style(position: Vec2, style: &ItemStyle) -> Self {
        Self {
            translation: position,
            scale: style.scale,
            rotation: style.rotation,
        }
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }

    pub fn apply_to_point(&self, point: Point2) -> Point2 {
        // 1. Scale
        let scaled = point * self.scale;

        // 2. Rotate
        let (sin_rot, cos_rot) = self.rotation_radians().sin_cos();
        let rotated = pt2(
            scaled.x * cos_rot - scaled.y * sin_rot,
            scaled.x * sin_rot + scaled.y * cos_rot,
        );

        // 3. Translate
        rotated + self.translation
    }

    /// Axis-aligned bounds of a `size` rect centered on the origin after this transform
    pub fn bounding_rect(&self, size: Vec2) -> Rect {
        let half = size / 2.0;
        let corners = [
            pt2(-half.x, -half.y),
            pt2(half.x, -half.y),
            pt2(half.x, half.y),
            pt2(-half.x, half.y),
        ]
        .map(|corner| self.apply_to_point(corner));

        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, p| acc.min(*p));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, p| acc.max(*p));
        let center = (min + max) / 2.0;
        let extent = max - min;
        Rect::from_x_y_w_h(center.x, center.y, extent.x, extent.y)
    }
}
