//! Spring - Damped spring smoothing for scroll and progress values.
//!
//! A value chases its target like a mass on a damped spring. Used for
//! smooth scrolling in the terminal host and for the scroll progress
//! indicator.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::Spring;
//!
//! let mut spring = Spring::progress();
//! spring.set_target(1.0);
//! while !spring.is_at_rest() {
//!     spring.step(1.0 / 60.0);
//! }
//! ```

use std::time::Duration;

/// Default stiffness used by the progress indicator.
pub const DEFAULT_STIFFNESS: f32 = 100.0;

/// Default damping used by the progress indicator.
pub const DEFAULT_DAMPING: f32 = 30.0;

/// Distance from the target below which the spring may settle.
pub const DEFAULT_REST_DELTA: f32 = 0.001;

/// Largest integration step; longer frames are subdivided.
const MAX_STEP: f32 = 1.0 / 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
    rest_delta: f32,
    rest_speed: f32,
}

impl Spring {
    pub fn new(stiffness: f32, damping: f32, rest_delta: f32) -> Self {
        Self {
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
            stiffness,
            damping,
            rest_delta,
            rest_speed: rest_delta * 10.0,
        }
    }

    /// Spring tuned for the 0..1 progress indicator.
    pub fn progress() -> Self {
        Self::new(DEFAULT_STIFFNESS, DEFAULT_DAMPING, DEFAULT_REST_DELTA)
    }

    /// Spring tuned for page offsets measured in rows or pixels.
    pub fn scroll() -> Self {
        Self::new(DEFAULT_STIFFNESS * 2.0, DEFAULT_DAMPING, 0.5)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to a value, dropping any motion.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_at_rest(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advance the simulation by `dt` seconds. Returns the new value.
    pub fn step(&mut self, dt: f32) -> f32 {
        if self.is_at_rest() || dt <= 0.0 {
            return self.value;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            let displacement = self.value - self.target;
            let accel = -self.stiffness * displacement - self.damping * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - self.target).abs() < self.rest_delta
            && self.velocity.abs() < self.rest_speed
        {
            self.snap_to(self.target);
        }

        self.value
    }

    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        self.step(elapsed.as_secs_f32())
    }
}
