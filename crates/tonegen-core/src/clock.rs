//! Shared synthesis clock.
//!
//! The audio path owns time: it advances the clock by the number of frames it
//! renders. The control thread only reads it, so every automation event is
//! anchored to the sample position the renderer will reach next, not to wall
//! clock time. Two ramps issued in the same control call therefore start on the
//! same sample.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "std")]
use std::sync::Arc;

/// Monotonic frame counter shared between the renderer and the control side.
///
/// Cloning is cheap and every clone observes the same counter.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frames: Arc<AtomicU64>,
    sample_rate: f32,
}

impl SampleClock {
    /// Create a clock at frame 0.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is not positive.
    pub fn new(sample_rate: f32) -> Self {
        assert!(sample_rate > 0.0, "sample rate must be positive");
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Current clock time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.time_of(self.frames())
    }

    /// Clock time in seconds of an absolute frame index.
    #[inline]
    pub fn time_of(&self, frame: u64) -> f64 {
        frame as f64 / f64::from(self.sample_rate)
    }

    /// Advance by `frames`. Called by the renderer after each buffer.
    #[inline]
    pub fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::AcqRel);
    }
}
