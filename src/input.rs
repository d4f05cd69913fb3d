//! Cross-thread tilt input
//!
//! Sensor callbacks arrive on their own thread at their own rate; the tick
//! loop only ever wants the freshest reading. A mutex-guarded snapshot keeps
//! the two axes consistent with each other, and writes replace rather than
//! queue, so a slow consumer never falls behind the device.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;

/// One two-axis tilt reading, in device units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
}

impl TiltSample {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Tilt as a vector, ready to scale into a velocity delta
    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<TiltSample> for Vec2 {
    fn from(sample: TiltSample) -> Self {
        sample.as_vec2()
    }
}

/// Latest-sample feed between a producer thread and the tick loop
///
/// Clone one end for the producer; both ends share the same slot.
#[derive(Debug, Clone, Default)]
pub struct TiltFeed {
    slot: Arc<Mutex<TiltSample>>,
}

impl TiltFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fresh sample, replacing whatever was there
    pub fn publish(&self, sample: TiltSample) {
        *self.lock() = sample;
    }

    /// Snapshot the latest sample
    pub fn latest(&self) -> TiltSample {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, TiltSample> {
        // a poisoned snapshot is still a usable snapshot
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
