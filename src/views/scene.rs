// src/views/scene.rs
//
// The running screensaver: emits items at the configured rate, retires or
// expires them, and keeps the live set within the configured maximum.

use super::ImageItemInstance;
use crate::animation::EmitScheduler;
use crate::models::{ConfigurationBehavior, EmitLocation, ScreensaverConfiguration};
use crate::utilities::top_left_to_centered;
use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Screen size in points, origin at the center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.w(), rect.h())
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let half = self.size() / 2.0;
        let x = if half.x > 0.0 { rng.gen_range(-half.x..=half.x) } else { 0.0 };
        let y = if half.y > 0.0 { rng.gen_range(-half.y..=half.y) } else { 0.0 };
        vec2(x, y)
    }
}

pub struct ScreensaverScene {
    behaviors: Vec<ConfigurationBehavior>,
    max_emit_count: usize,
    lifetime: Option<f32>,
    emit_location: EmitLocation,
    bounds: Bounds,
    image_count: usize,
    scheduler: EmitScheduler,
    // oldest first
    items: Vec<ImageItemInstance>,
    next_id: u64,
    rng: StdRng,
}

impl ScreensaverScene {
    pub fn new(config: &ScreensaverConfiguration, bounds: Bounds, image_count: usize) -> Self {
        Self::with_rng(config, bounds, image_count, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: &ScreensaverConfiguration,
        bounds: Bounds,
        image_count: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            behaviors: config.enabled_behaviors().cloned().collect(),
            max_emit_count: config.max_emit_count as usize,
            lifetime: config.lifetime(),
            emit_location: config.emit_location,
            bounds,
            image_count,
            scheduler: EmitScheduler::new(config.image_emit_rate),
            items: Vec::new(),
            next_id: 0,
            rng,
        }
    }

    pub fn update(&mut self, time: f32, dt: f32) {
        // 1. advance items and drop the dead ones
        for item in &mut self.items {
            item.update(time);
        }
        self.items.retain(|item| !item.is_dead());

        // 2. emissions due this frame
        let due = self.scheduler.due(dt);
        if due == 0 || self.image_count == 0 || self.max_emit_count == 0 {
            return;
        }

        // 3. emit, retire the oldest, or drop
        let mut unused = 0;
        for _ in 0..due {
            if self.items.len() < self.max_emit_count {
                self.emit(time);
            } else if self.lifetime.is_none() && self.retire_oldest(time) {
                // items without end transitions free their slot at once,
                // otherwise the slot frees up when the retiring item dies
                if self.items.len() < self.max_emit_count {
                    self.emit(time);
                }
            } else {
                unused += 1;
            }
        }

        // 4. hand back what could not be used
        self.scheduler.defer(unused);
    }

    fn emit(&mut self, time: f32) {
        let image_index = self.rng.gen_range(0..self.image_count);
        let position = self.emit_position();
        let item = ImageItemInstance::new(
            self.next_id,
            image_index,
            position,
            time,
            self.lifetime,
            &self.behaviors,
        );
        debug!(id = self.next_id, image_index, x = position.x, y = position.y, "Emitted item");
        self.next_id += 1;
        self.items.push(item);
    }

    // retiring items already count towards the maximum
    fn retire_oldest(&mut self, time: f32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.is_alive()) else {
            return false;
        };
        item.retire(time);
        if item.is_dead() {
            let id = item.id();
            self.items.retain(|item| item.id() != id);
        }
        true
    }

    pub fn emit_position(&mut self) -> Vec2 {
        match self.emit_location {
            EmitLocation::Random => self.bounds.random_point(&mut self.rng),
            EmitLocation::Center => Vec2::ZERO,
            EmitLocation::Custom { x, y } => top_left_to_centered(x as f32, y as f32, self.bounds.size()),
        }
    }

    pub fn items(&self) -> &[ImageItemInstance] {
        &self.items
    }

    pub fn live_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_emitted(&self) -> u64 {
        self.next_id
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyBehavior;
    use crate::views::ItemPhase;

    fn config(rate: f32, max: u32) -> ScreensaverConfiguration {
        ScreensaverConfiguration {
            image_emit_rate: rate,
            max_emit_count: max,
            infinite_lifetime: true,
            ..ScreensaverConfiguration::default()
        }
    }

    fn scene(config: &ScreensaverConfiguration, image_count: usize) -> ScreensaverScene {
        ScreensaverScene::with_rng(
            config,
            Bounds::new(800.0, 600.0),
            image_count,
            StdRng::seed_from_u64(7),
        )
    }

    // runs `seconds` of frames at 10 fps, returns the final time
    fn run(scene: &mut ScreensaverScene, start: f32, seconds: f32) -> f32 {
        let dt = 0.1;
        let mut time = start;
        for _ in 0..(seconds / dt).round() as usize {
            time += dt;
            scene.update(time, dt);
        }
        time
    }

    #[test]
    fn test_first_frame_emits() {
        let config = config(1.0, 5);
        let mut scene = scene(&config, 3);
        scene.update(0.0, 0.0);
        assert_eq!(scene.live_count(), 1);
        assert!(scene.items()[0].image_index() < 3);
    }

    #[test]
    fn test_nothing_emitted_without_images_or_capacity() {
        let config_a = config(10.0, 5);
        let mut no_images = scene(&config_a, 0);
        run(&mut no_images, 0.0, 2.0);
        assert_eq!(no_images.live_count(), 0);

        let config_b = config(10.0, 0);
        let mut no_capacity = scene(&config_b, 2);
        run(&mut no_capacity, 0.0, 2.0);
        assert_eq!(no_capacity.live_count(), 0);
    }

    #[test]
    fn test_infinite_mode_retires_oldest_at_cap() {
        // without end transitions retired items vanish at once
        let config = config(5.0, 3);
        let mut scene = scene(&config, 1);
        run(&mut scene, 0.0, 4.0);
        assert_eq!(scene.live_count(), 3);
        assert!(scene.total_emitted() > 3);

        // survivors are the newest ones
        let ids: Vec<u64> = scene.items().iter().map(|item| item.id()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(ids[0] > 0);
    }

    #[test]
    fn test_retiring_items_count_towards_cap() {
        let mut config = config(10.0, 2);
        config.behaviors = vec![ConfigurationBehavior::AlphaChange(
            PropertyBehavior::new(1.0, 1.0, 0.0).with_end_transition(0.0, 100.0),
        )];
        let mut scene = scene(&config, 1);
        run(&mut scene, 0.0, 1.0);

        assert_eq!(scene.live_count(), 2);
        assert!(scene
            .items()
            .iter()
            .all(|item| matches!(item.phase(), ItemPhase::Retiring { .. })));
        assert_eq!(scene.total_emitted(), 2);
    }

    #[test]
    fn test_freed_slot_is_reused_after_retirement() {
        let mut config = config(10.0, 2);
        config.behaviors = vec![ConfigurationBehavior::AlphaChange(
            PropertyBehavior::new(1.0, 1.0, 0.0).with_end_transition(0.0, 0.5),
        )];
        let mut scene = scene(&config, 1);

        // both slots taken, both items retiring, nothing new yet
        let time = run(&mut scene, 0.0, 0.4);
        assert_eq!(scene.total_emitted(), 2);
        assert!(scene.items().iter().all(|item| !item.is_alive()));

        // once the first retiring item dies its slot is filled
        run(&mut scene, time, 1.0);
        assert!(scene.total_emitted() > 2);
        assert!(scene.live_count() <= 2);
        assert!(scene.items().iter().all(|item| item.id() >= 2));
    }

    #[test]
    fn test_long_frame_does_not_flush_the_screen() {
        let mut config = config(5.0, 10);
        config.behaviors = vec![ConfigurationBehavior::AlphaChange(
            PropertyBehavior::new(1.0, 1.0, 0.0).with_end_transition(0.0, 2.0),
        )];
        let mut scene = scene(&config, 3);
        let time = run(&mut scene, 0.0, 6.0);

        let alive_before = scene.items().iter().filter(|item| item.is_alive()).count();
        let emitted_before = scene.total_emitted();
        assert!(alive_before > 0);

        scene.update(time + 30.0, 30.0);

        // the 30 s frame counts like a short one
        let alive_after = scene.items().iter().filter(|item| item.is_alive()).count();
        assert!(alive_after >= alive_before);
        assert!(scene.total_emitted() - emitted_before <= 2);
        assert!(scene.live_count() <= 10);
    }

    #[test]
    fn test_finite_mode_defers_at_cap() {
        let mut config = config(10.0, 2);
        config.infinite_lifetime = false;
        config.lifetime_seconds = 1.0;
        let mut scene = scene(&config, 1);

        // full after the first frame, then nothing until an item expires
        let time = run(&mut scene, 0.0, 0.9);
        assert_eq!(scene.total_emitted(), 2);
        assert!(scene.items().iter().all(|item| item.is_alive()));

        // expired slots refill right away without a burst of saved-up emissions
        run(&mut scene, time, 0.5);
        assert_eq!(scene.live_count(), 2);
        assert!((3..=4).contains(&scene.total_emitted()));
        assert!(scene.items().iter().all(|item| item.id() >= 2));
    }

    #[test]
    fn test_finite_mode_expires_and_refills() {
        let mut config = config(10.0, 4);
        config.infinite_lifetime = false;
        config.lifetime_seconds = 1.0;
        let mut scene = scene(&config, 2);

        let time = run(&mut scene, 0.0, 0.5);
        assert_eq!(scene.live_count(), 4);
        let first = scene.items()[0].id();

        // at cap in finite mode nothing is retired
        run(&mut scene, time, 0.3);
        assert_eq!(scene.items()[0].id(), first);

        // after the lifetime the oldest are gone and replaced
        run(&mut scene, time + 0.3, 1.5);
        assert!(scene.items().iter().all(|item| item.id() != first));
        assert!(scene.live_count() <= 4);
    }

    #[test]
    fn test_emit_positions() {
        let mut config = config(1.0, 10);
        config.emit_location = EmitLocation::Center;
        let mut center = scene(&config, 1);
        assert_eq!(center.emit_position(), Vec2::ZERO);

        config.emit_location = EmitLocation::Custom { x: 100, y: 50 };
        let mut custom = scene(&config, 1);
        assert_eq!(custom.emit_position(), vec2(-300.0, 250.0));

        config.emit_location = EmitLocation::Random;
        let mut random = scene(&config, 1);
        for _ in 0..100 {
            let point = random.emit_position();
            assert!(point.x.abs() <= 400.0 && point.y.abs() <= 300.0);
        }
    }
}
