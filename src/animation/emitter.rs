// src/animation/emitter.rs
//
// Emission timing. Converts frame deltas into a whole number of emissions at
// the configured rate, carrying the fractional remainder between frames.

/// Longest frame counted towards emissions, in seconds. A stalled window or a
/// resume from sleep advances the emitter by this much at most.
pub const MAX_FRAME_DELTA: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct EmitScheduler {
    rate: f32,
    accumulator: f32,
}

impl EmitScheduler {
    /// `rate` is emissions per second. The first update emits immediately.
    pub fn new(rate: f32) -> Self {
        let rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
        Self {
            rate,
            accumulator: if rate > 0.0 { 1.0 } else { 0.0 },
        }
    }

    /// Advance by `dt` seconds and take the emissions now due
    pub fn due(&mut self, dt: f32) -> u32 {
        if self.rate <= 0.0 {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DELTA) * self.rate;
        let due = self.accumulator.floor();
        self.accumulator -= due;
        due as u32
    }

    /// Return emissions that could not be used. At most one is kept so that a
    /// blocked emitter resumes at its normal pace instead of bursting.
    pub fn defer(&mut self, unused: u32) {
        if unused > 0 {
            self.accumulator = (self.accumulator + unused as f32).min(1.0);
        }
    }
}
